//! SQL validation against an exclusion policy.
//!
//! The [`Validator`] ties the pieces together: it extracts references from a statement,
//! checks each one against the [`CompiledMatcher`] for its kind, and collects a
//! [`ValidationVerdict`]. It never fails and never decides what to do with the verdict;
//! that is left to [`is_blocked`] and [`should_warn`], which callers combine with other
//! signals (such as the destructive-statement guard).

use crate::extractor::{HeuristicExtractor, ReferenceExtractor};
use crate::matcher::CompiledMatcher;
use crate::verdict::{ValidationVerdict, Violation};
use qry_core::{Mode, SecurityConfig};

/// Validates SQL statements against one immutable policy.
pub struct Validator {
    config: Option<SecurityConfig>,
    matcher: CompiledMatcher,
    extractor: Box<dyn ReferenceExtractor>,
}

impl Validator {
    /// Create a validator for a policy, compiling its rules. `None` disables validation.
    pub fn new(config: Option<SecurityConfig>) -> Self {
        let matcher = CompiledMatcher::compile(config.as_ref());
        Self {
            config,
            matcher,
            extractor: Box::new(HeuristicExtractor::new()),
        }
    }

    /// Replace the reference extractor.
    pub fn with_extractor(mut self, extractor: impl ReferenceExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn config(&self) -> Option<&SecurityConfig> {
        self.config.as_ref()
    }

    pub fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    /// The enforcement mode, if a policy is loaded.
    pub fn mode(&self) -> Option<Mode> {
        self.config.as_ref().map(|c| c.mode)
    }

    /// True when a policy is loaded and enforced.
    pub fn is_active(&self) -> bool {
        self.config.as_ref().is_some_and(SecurityConfig::is_active)
    }

    /// Check a statement for references to excluded tables and columns.
    ///
    /// Without an active policy this returns a valid verdict without scanning the SQL.
    pub fn validate(&self, sql: &str) -> ValidationVerdict {
        if !self.is_active() {
            return ValidationVerdict::valid(sql);
        }

        let violations: Vec<Violation> = self
            .extractor
            .extract(sql)
            .into_iter()
            .filter_map(|reference| {
                let rule = self.matcher.match_kind(reference.kind, &reference.name)?;
                Some(Violation {
                    kind: reference.kind,
                    matched_rule: rule.to_string(),
                    name: reference.name,
                    context: reference.source_clause,
                })
            })
            .collect();

        let verdict = ValidationVerdict::new(sql, violations);
        tracing::debug!(
            valid = verdict.is_valid(),
            violations = verdict.violations().len(),
            "validated SQL against security policy"
        );
        verdict
    }

    /// See [`is_blocked`].
    pub fn is_blocked(&self, verdict: &ValidationVerdict) -> bool {
        is_blocked(self.mode(), verdict)
    }

    /// See [`should_warn`].
    pub fn should_warn(&self, verdict: &ValidationVerdict) -> bool {
        should_warn(self.mode(), verdict)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// A verdict with violations is blocked only under strict mode.
pub fn is_blocked(mode: Option<Mode>, verdict: &ValidationVerdict) -> bool {
    !verdict.is_valid() && mode == Some(Mode::Strict)
}

/// A verdict with violations is a warning under any mode other than strict, including no mode.
pub fn should_warn(mode: Option<Mode>, verdict: &ValidationVerdict) -> bool {
    !verdict.is_valid() && mode != Some(Mode::Strict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ReferenceKind, SqlReference};
    use pretty_assertions::assert_eq;
    use qry_core::ExcludeConfig;

    fn policy(mode: Mode, tables: &[&str], columns: &[&str], patterns: &[&str]) -> SecurityConfig {
        SecurityConfig::new(
            mode,
            ExcludeConfig::new(
                tables.iter().copied(),
                columns.iter().copied(),
                patterns.iter().copied(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_excluded_table() {
        let validator = Validator::new(Some(policy(Mode::Strict, &["secrets"], &[], &[])));
        let verdict = validator.validate("SELECT * FROM secrets");
        assert!(!verdict.is_valid());
        assert_eq!(verdict.violations().len(), 1);
        let v = &verdict.violations()[0];
        assert_eq!(v.kind, ReferenceKind::Table);
        assert_eq!(v.name, "secrets");
        assert_eq!(v.matched_rule, "secrets");
        assert_eq!(v.context, "FROM clause");
    }

    #[test]
    fn test_pattern_column() {
        let validator = Validator::new(Some(policy(Mode::Warn, &[], &[], &["*_pii"])));
        let verdict = validator.validate("SELECT user_pii FROM users");
        assert_eq!(verdict.violations().len(), 1);
        let v = &verdict.violations()[0];
        assert_eq!(v.kind, ReferenceKind::Column);
        assert_eq!(v.name, "user_pii");
        assert_eq!(v.matched_rule, "*_pii");

        assert!(validator.validate("SELECT user_id FROM users").is_valid());
    }

    #[test]
    fn test_violations_in_extraction_order() {
        let validator = Validator::new(Some(policy(
            Mode::Strict,
            &["payroll"],
            &["salary", "ssn"],
            &[],
        )));
        let verdict =
            validator.validate("SELECT ssn, salary FROM payroll WHERE salary > 100 ORDER BY ssn");
        let names: Vec<&str> = verdict.violations().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["payroll", "ssn", "salary"]);
    }

    #[test]
    fn test_column_rule_does_not_match_table_reference() {
        let validator = Validator::new(Some(policy(Mode::Strict, &[], &["users"], &[])));
        assert!(validator.validate("SELECT id FROM users").is_valid());
    }

    #[test]
    fn test_disabled_policy_skips_extraction() {
        struct Panicking;
        impl ReferenceExtractor for Panicking {
            fn extract(&self, _sql: &str) -> Vec<SqlReference> {
                panic!("extractor must not run without an active policy");
            }
        }

        let validator = Validator::new(None).with_extractor(Panicking);
        assert!(validator.validate("SELECT * FROM secrets").is_valid());

        let mut config = policy(Mode::Strict, &["secrets"], &[], &[]);
        config.enabled = false;
        let validator = Validator::new(Some(config)).with_extractor(Panicking);
        assert!(validator.validate("SELECT * FROM secrets").is_valid());
    }

    #[test]
    fn test_custom_extractor() {
        struct Fixed;
        impl ReferenceExtractor for Fixed {
            fn extract(&self, _sql: &str) -> Vec<SqlReference> {
                vec![SqlReference::column("ssn", "custom")]
            }
        }

        let validator =
            Validator::new(Some(policy(Mode::Warn, &[], &["ssn"], &[]))).with_extractor(Fixed);
        let verdict = validator.validate("anything");
        assert_eq!(verdict.violations()[0].context, "custom");
    }

    #[test]
    fn test_mode_predicates() {
        let violated = ValidationVerdict::new(
            "SELECT * FROM secrets",
            vec![Violation {
                kind: ReferenceKind::Table,
                name: "secrets".to_string(),
                matched_rule: "secrets".to_string(),
                context: "FROM clause".to_string(),
            }],
        );
        assert!(is_blocked(Some(Mode::Strict), &violated));
        assert!(!should_warn(Some(Mode::Strict), &violated));
        assert!(!is_blocked(Some(Mode::Warn), &violated));
        assert!(should_warn(Some(Mode::Warn), &violated));
        assert!(!is_blocked(None, &violated));
        assert!(should_warn(None, &violated));

        let clean = ValidationVerdict::valid("SELECT 1");
        assert!(!is_blocked(Some(Mode::Strict), &clean));
        assert!(!should_warn(Some(Mode::Warn), &clean));
    }
}

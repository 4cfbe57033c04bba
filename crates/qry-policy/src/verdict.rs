//! Validation outcome types.

use crate::reference::ReferenceKind;
use serde::Serialize;
use std::fmt;

/// One confirmed match between an extracted reference and an exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ReferenceKind,
    /// The name as it appeared in the SQL.
    pub name: String,
    /// The exact name or wildcard pattern that matched.
    pub matched_rule: String,
    /// Clause the reference came from.
    pub context: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.name)?;
        if !self.matched_rule.is_empty() && !self.matched_rule.eq_ignore_ascii_case(&self.name) {
            write!(f, " (matched rule: {})", self.matched_rule)?;
        }
        if !self.context.is_empty() {
            write!(f, " in {}", self.context)?;
        }
        Ok(())
    }
}

/// The complete outcome of validating one statement.
///
/// `is_valid()` holds exactly when there are no violations. Violations are in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    #[serde(rename = "valid")]
    is_valid: bool,
    violations: Vec<Violation>,
    #[serde(rename = "sql")]
    original_sql: String,
}

impl ValidationVerdict {
    pub fn new(original_sql: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
            original_sql: original_sql.into(),
        }
    }

    /// A verdict with no violations.
    pub fn valid(original_sql: impl Into<String>) -> Self {
        Self::new(original_sql, Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn original_sql(&self) -> &str {
        &self.original_sql
    }

    /// Multi-line description of every violation. Empty for a valid verdict.
    pub fn error_message(&self) -> String {
        if self.is_valid {
            return String::new();
        }
        let mut msg = String::from("Security violation: query references excluded data\n");
        for v in &self.violations {
            msg.push_str("  - ");
            msg.push_str(&v.to_string());
            msg.push('\n');
        }
        msg
    }

    /// One-line summary. Empty for a valid verdict.
    pub fn summary(&self) -> String {
        match self.violations.as_slice() {
            [] => String::new(),
            [v] => format!("blocked: references {} '{}'", v.kind, v.name),
            many => format!("blocked: {} security violations", many.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn violation(kind: ReferenceKind, name: &str, rule: &str, context: &str) -> Violation {
        Violation {
            kind,
            name: name.to_string(),
            matched_rule: rule.to_string(),
            context: context.to_string(),
        }
    }

    #[test]
    fn test_valid_verdict_renders_nothing() {
        let verdict = ValidationVerdict::valid("SELECT 1");
        assert!(verdict.is_valid());
        assert_eq!(verdict.error_message(), "");
        assert_eq!(verdict.summary(), "");
        assert_eq!(verdict.original_sql(), "SELECT 1");
    }

    #[test]
    fn test_error_message_lists_violations() {
        let verdict = ValidationVerdict::new(
            "SELECT user_pii FROM secrets",
            vec![
                violation(ReferenceKind::Table, "secrets", "secrets", "FROM clause"),
                violation(ReferenceKind::Column, "user_pii", "*_pii", "SELECT clause"),
            ],
        );
        assert!(!verdict.is_valid());
        assert_eq!(
            verdict.error_message(),
            "Security violation: query references excluded data\n\
             \x20 - table: secrets in FROM clause\n\
             \x20 - column: user_pii (matched rule: *_pii) in SELECT clause\n"
        );
        assert_eq!(verdict.summary(), "blocked: 2 security violations");
    }

    #[test]
    fn test_single_violation_summary() {
        let verdict = ValidationVerdict::new(
            "SELECT * FROM secrets",
            vec![violation(ReferenceKind::Table, "secrets", "secrets", "FROM clause")],
        );
        assert_eq!(verdict.summary(), "blocked: references table 'secrets'");
    }

    #[test]
    fn test_serializes_with_short_field_names() {
        let verdict = ValidationVerdict::valid("SELECT 1");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["sql"], "SELECT 1");
        assert!(json["violations"].as_array().unwrap().is_empty());
    }
}

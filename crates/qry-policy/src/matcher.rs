//! Exclusion rule matching.
//!
//! A [`CompiledMatcher`] is built once from a [`SecurityConfig`] and is read-only afterwards,
//! so it can be shared freely between threads.
//!
//! - Exact table and column names are indexed case-insensitively.
//! - Wildcard patterns (`*` any run of characters, `?` exactly one) become anchored,
//!   case-insensitive regular expressions: `*_secret` matches `user_secret` but not
//!   `user_secret_data`. Patterns apply to tables and columns alike.
//!
//! Exact names are checked before patterns; patterns are tried in configuration order.

use crate::reference::ReferenceKind;
use qry_core::SecurityConfig;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CompiledPattern {
    original: String,
    regex: Regex,
}

/// Lookup structure for exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct CompiledMatcher {
    /// Lower-cased name -> name as configured.
    exact_tables: HashMap<String, String>,
    exact_columns: HashMap<String, String>,
    patterns: Vec<CompiledPattern>,
}

impl CompiledMatcher {
    /// Compile the rules of a policy. An absent policy yields a matcher that matches nothing.
    ///
    /// A pattern that cannot be compiled is logged and dropped; the remaining rules still apply.
    pub fn compile(config: Option<&SecurityConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };

        let exact_tables = index_names(&config.exclude.tables);
        let exact_columns = index_names(&config.exclude.columns);
        let patterns = config
            .exclude
            .patterns
            .iter()
            .filter_map(|p| compile_pattern(p))
            .collect();

        Self {
            exact_tables,
            exact_columns,
            patterns,
        }
    }

    /// Check a table name. Returns the rule that matched.
    pub fn match_table(&self, name: &str) -> Option<&str> {
        self.exact_tables
            .get(&name.to_lowercase())
            .map(String::as_str)
            .or_else(|| self.match_pattern(name))
    }

    /// Check a column name. Returns the rule that matched.
    pub fn match_column(&self, name: &str) -> Option<&str> {
        self.exact_columns
            .get(&name.to_lowercase())
            .map(String::as_str)
            .or_else(|| self.match_pattern(name))
    }

    /// Check a name against table rules, then column rules.
    ///
    /// Table rules take priority, so a pattern match is always reported as a table.
    pub fn match_any(&self, name: &str) -> Option<(ReferenceKind, &str)> {
        if let Some(rule) = self.match_table(name) {
            return Some((ReferenceKind::Table, rule));
        }
        self.match_column(name)
            .map(|rule| (ReferenceKind::Column, rule))
    }

    /// Check a name against the rules for the given kind.
    pub fn match_kind(&self, kind: ReferenceKind, name: &str) -> Option<&str> {
        match kind {
            ReferenceKind::Table => self.match_table(name),
            ReferenceKind::Column => self.match_column(name),
        }
    }

    /// Number of patterns that compiled successfully.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// True when no rule is loaded.
    pub fn is_empty(&self) -> bool {
        self.exact_tables.is_empty() && self.exact_columns.is_empty() && self.patterns.is_empty()
    }

    fn match_pattern(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(name))
            .map(|p| p.original.as_str())
    }
}

fn index_names(names: &[String]) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(names.len());
    for name in names {
        index
            .entry(name.to_lowercase())
            .or_insert_with(|| name.clone());
    }
    index
}

/// Translate a wildcard pattern into an anchored, case-insensitive regex.
fn compile_pattern(pattern: &str) -> Option<CompiledPattern> {
    if pattern.is_empty() {
        return None;
    }

    // `regex::escape` escapes `*` and `?` too; turn them back into wildcards.
    let translated = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    match RegexBuilder::new(&format!("^{}$", translated))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(CompiledPattern {
            original: pattern.to_string(),
            regex,
        }),
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "dropping invalid exclusion pattern");
            None
        }
    }
}

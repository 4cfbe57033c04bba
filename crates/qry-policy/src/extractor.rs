//! Table and column reference extraction.
//!
//! The default extractor is a heuristic scanner, not a parser: it runs independent
//! clause-scoped regular expressions over the raw statement and merges what they find.
//! It favours recall over precision:
//!
//! - `orders.id` yields both `orders` and `id` as column candidates.
//! - Identifier-shaped text inside string literals is reported like any other token.
//! - The projection ends at the first `FROM`, so `SELECT EXTRACT(YEAR FROM created_at), ssn
//!   FROM people` reports `created_at` as a table and never sees `ssn`.
//!
//! Everything goes through the [`ReferenceExtractor`] trait so that a stricter implementation
//! can replace the heuristic without touching matching or validation.

use crate::keywords::{is_sql_function, is_sql_keyword};
use crate::reference::{ReferenceKind, SqlReference};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Produces the table and column references of a SQL statement.
///
/// Implementations must be total: unrecognised input yields an empty list, never an error.
pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, sql: &str) -> Vec<SqlReference>;
}

/// Clause-scoped regular-expression scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceExtractor for HeuristicExtractor {
    fn extract(&self, sql: &str) -> Vec<SqlReference> {
        extract_references(sql)
    }
}

struct ClausePattern {
    regex: Regex,
    clause: &'static str,
}

impl ClausePattern {
    fn new(pattern: &str, clause: &'static str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("valid clause regex"),
            clause,
        }
    }
}

static TABLE_PATTERNS: LazyLock<Vec<ClausePattern>> = LazyLock::new(|| {
    vec![
        ClausePattern::new(r"(?i)\bFROM\s+([a-zA-Z_][a-zA-Z0-9_]*)", "FROM clause"),
        ClausePattern::new(r"(?i)\bJOIN\s+([a-zA-Z_][a-zA-Z0-9_]*)", "JOIN clause"),
        ClausePattern::new(r"(?i)\bINTO\s+([a-zA-Z_][a-zA-Z0-9_]*)", "INTO clause"),
        ClausePattern::new(r"(?i)\bUPDATE\s+([a-zA-Z_][a-zA-Z0-9_]*)", "UPDATE clause"),
        ClausePattern::new(
            r"(?i)\bTRUNCATE\s+(?:TABLE\s+)?([a-zA-Z_][a-zA-Z0-9_]*)",
            "TRUNCATE",
        ),
        ClausePattern::new(
            r"(?i)\bDROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?([a-zA-Z_][a-zA-Z0-9_]*)",
            "DROP TABLE",
        ),
        ClausePattern::new(r"(?i)\bDELETE\s+FROM\s+([a-zA-Z_][a-zA-Z0-9_]*)", "DELETE FROM"),
    ]
});

// Spans end at the next clause boundary or the end of the statement; `(?s)` lets them cross
// line breaks.
static COLUMN_PATTERNS: LazyLock<Vec<ClausePattern>> = LazyLock::new(|| {
    vec![
        ClausePattern::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b", "SELECT clause"),
        ClausePattern::new(
            r"(?is)\bWHERE\s+(.+?)(?:\s+ORDER\s+BY\b|\s+GROUP\s+BY\b|\s+LIMIT\b|\s+HAVING\b|;|$)",
            "WHERE clause",
        ),
        ClausePattern::new(
            r"(?is)\bORDER\s+BY\s+(.+?)(?:\s+LIMIT\b|;|$)",
            "ORDER BY clause",
        ),
        ClausePattern::new(
            r"(?is)\bGROUP\s+BY\s+(.+?)(?:\s+ORDER\s+BY\b|\s+HAVING\b|\s+LIMIT\b|;|$)",
            "GROUP BY clause",
        ),
    ]
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\b").expect("valid identifier regex"));

/// Extract table and column references from a statement.
///
/// Tables come first, then columns, each in scan order. Duplicates are dropped per kind,
/// case-insensitively; the first occurrence keeps its clause label.
pub fn extract_references(sql: &str) -> Vec<SqlReference> {
    let mut refs = extract_tables(sql);
    refs.extend(extract_columns(sql));
    refs
}

fn extract_tables(sql: &str) -> Vec<SqlReference> {
    let mut refs = Vec::new();
    let mut seen = HashSet::new();

    for pattern in TABLE_PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(sql) {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            // `FROM (SELECT ...` and similar capture a keyword, not a table.
            if is_sql_keyword(name) {
                continue;
            }
            if seen.insert(name.to_lowercase()) {
                refs.push(SqlReference::table(name, pattern.clause));
            }
        }
    }

    refs
}

fn extract_columns(sql: &str) -> Vec<SqlReference> {
    let mut refs = Vec::new();
    let mut seen = HashSet::new();

    for pattern in COLUMN_PATTERNS.iter() {
        let Some(span) = pattern.regex.captures(sql).and_then(|caps| caps.get(1)) else {
            continue;
        };
        for name in column_candidates(span.as_str()) {
            if seen.insert(name.to_lowercase()) {
                refs.push(SqlReference::column(name, pattern.clause));
            }
        }
    }

    refs
}

/// Every identifier token in a clause span that is neither a keyword nor a built-in function.
fn column_candidates(span: &str) -> impl Iterator<Item = &str> {
    IDENTIFIER
        .captures_iter(span)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|word| !is_sql_keyword(word) && !is_sql_function(word))
}

/// References of one kind, in extraction order.
pub fn references_of_kind(refs: &[SqlReference], kind: ReferenceKind) -> Vec<&SqlReference> {
    refs.iter().filter(|r| r.kind == kind).collect()
}

//! Detection of destructive SQL statements.
//!
//! This is NOT a SQL parser. Two layers of pattern matching run over the raw text:
//!
//! 1. **Precise rules**, evaluated in order, each recognising one statement shape:
//!    `DROP TABLE|DATABASE|SCHEMA|INDEX`, `TRUNCATE TABLE`, a trailing `DELETE FROM <name>`
//!    without `WHERE`, `UPDATE <name> SET ...` with no `WHERE` anywhere, and
//!    `ALTER TABLE ... DROP ...`.
//! 2. **A coarse fallback** over the upper-cased text that flags any bare `DROP` or `TRUNCATE`
//!    keyword, and a `DELETE`/`UPDATE` keyword with no `WHERE` after its last occurrence.
//!
//! The fallback is over-inclusive on purpose and must never be less sensitive than the precise
//! rules. A missed warning costs more than a spurious one.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static DROP_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDROP\s+(TABLE|DATABASE|SCHEMA|INDEX)\b").expect("valid regex")
});

static TRUNCATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTRUNCATE\s+TABLE\b").expect("valid regex"));

static DELETE_UNSCOPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bDELETE\s+FROM\s+[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?\s*;?\s*$")
        .expect("valid regex")
});

static UPDATE_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bUPDATE\s+[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?\s+SET\b")
        .expect("valid regex")
});

static ALTER_TABLE_DROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bALTER\s+TABLE\b.*?\bDROP\b").expect("valid regex"));

static WHERE_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid regex"));

// The fallback patterns run on upper-cased text.
static BARE_DROP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bDROP\b").expect("valid regex"));

static BARE_TRUNCATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bTRUNCATE\b").expect("valid regex"));

static BARE_WRITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(DELETE|UPDATE)\b").expect("valid regex"));

static BARE_WHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bWHERE\b").expect("valid regex"));

/// Which rule flagged a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructiveKind {
    /// `DROP TABLE`, `DROP DATABASE`, `DROP SCHEMA` or `DROP INDEX`.
    DropObject,
    /// `TRUNCATE TABLE`.
    TruncateTable,
    /// `DELETE FROM <table>` with no `WHERE`.
    DeleteWithoutWhere,
    /// `UPDATE <table> SET ...` with no `WHERE`.
    UpdateWithoutWhere,
    /// `ALTER TABLE ... DROP ...`.
    AlterTableDrop,
    /// Caught only by the coarse keyword fallback.
    Fallback,
}

impl fmt::Display for DestructiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DestructiveKind::DropObject => "drop_object",
            DestructiveKind::TruncateTable => "truncate_table",
            DestructiveKind::DeleteWithoutWhere => "delete_without_where",
            DestructiveKind::UpdateWithoutWhere => "update_without_where",
            DestructiveKind::AlterTableDrop => "alter_table_drop",
            DestructiveKind::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// An advisory warning about a destructive statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestructiveWarning {
    pub kind: DestructiveKind,
    pub message: String,
}

impl DestructiveWarning {
    fn new(kind: DestructiveKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DestructiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check SQL for destructive statements.
///
/// Returns the warning message, or an empty string when nothing was found.
pub fn check_destructive(sql: &str) -> String {
    detect(sql).map(|w| w.message).unwrap_or_default()
}

/// Check SQL for destructive statements, reporting which rule fired.
///
/// Precise rules are tried first; the fallback only runs when none of them match.
pub fn detect(sql: &str) -> Option<DestructiveWarning> {
    let warning = check_precise(sql).or_else(|| check_fallback(sql));
    if let Some(w) = &warning {
        tracing::debug!(kind = %w.kind, message = %w.message, "destructive statement detected");
    }
    warning
}

/// Run only the precise statement-shape rules. The first match wins.
pub fn check_precise(sql: &str) -> Option<DestructiveWarning> {
    if let Some(caps) = DROP_OBJECT.captures(sql) {
        let object = caps[1].to_uppercase();
        return Some(DestructiveWarning::new(
            DestructiveKind::DropObject,
            format!("Destructive operation: DROP {}", object),
        ));
    }

    if TRUNCATE_TABLE.is_match(sql) {
        return Some(DestructiveWarning::new(
            DestructiveKind::TruncateTable,
            "Destructive operation: TRUNCATE TABLE",
        ));
    }

    if DELETE_UNSCOPED.is_match(sql) {
        return Some(DestructiveWarning::new(
            DestructiveKind::DeleteWithoutWhere,
            "DELETE without WHERE clause: every row in the table will be removed",
        ));
    }

    if UPDATE_SET.is_match(sql) && !WHERE_CLAUSE.is_match(sql) {
        return Some(DestructiveWarning::new(
            DestructiveKind::UpdateWithoutWhere,
            "UPDATE without WHERE clause: every row in the table will be modified",
        ));
    }

    if ALTER_TABLE_DROP.is_match(sql) {
        return Some(DestructiveWarning::new(
            DestructiveKind::AlterTableDrop,
            "Destructive operation: ALTER TABLE ... DROP",
        ));
    }

    None
}

/// Run only the coarse keyword fallback.
pub fn check_fallback(sql: &str) -> Option<DestructiveWarning> {
    let upper = sql.to_uppercase();

    if BARE_DROP.is_match(&upper) {
        return Some(fallback_warning("DROP"));
    }

    if BARE_TRUNCATE.is_match(&upper) {
        return Some(fallback_warning("TRUNCATE"));
    }

    if let Some(last) = BARE_WRITE.find_iter(&upper).last() {
        if !BARE_WHERE.is_match(&upper[last.end()..]) {
            return Some(fallback_warning(&format!("{} without WHERE", last.as_str())));
        }
    }

    None
}

fn fallback_warning(what: &str) -> DestructiveWarning {
    DestructiveWarning::new(
        DestructiveKind::Fallback,
        format!("Potentially destructive operation: {}", what),
    )
}

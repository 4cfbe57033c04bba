//! Identifier references found in SQL text.

use serde::Serialize;
use std::fmt;

/// Whether a reference names a table or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Table,
    Column,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Table => write!(f, "table"),
            ReferenceKind::Column => write!(f, "column"),
        }
    }
}

/// One identifier occurrence extracted from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlReference {
    /// The identifier as written in the SQL.
    pub name: String,
    /// Table or column.
    pub kind: ReferenceKind,
    /// Where it was found, e.g. "FROM clause". Diagnostic only.
    pub source_clause: String,
}

impl SqlReference {
    pub fn table(name: impl Into<String>, source_clause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ReferenceKind::Table,
            source_clause: source_clause.into(),
        }
    }

    pub fn column(name: impl Into<String>, source_clause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ReferenceKind::Column,
            source_clause: source_clause.into(),
        }
    }
}

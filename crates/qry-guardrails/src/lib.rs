//! # qry-guardrails
//!
//! Advisory checks on generated SQL that run whether or not a security policy is configured.
//!
//! The only guard today flags destructive statement shapes (`DROP`, `TRUNCATE`, `DELETE` or
//! `UPDATE` without `WHERE`, `ALTER TABLE ... DROP`). It never blocks anything: callers surface
//! the returned message next to the SQL.

pub mod destructive;

pub use destructive::{
    DestructiveKind, DestructiveWarning, check_destructive, check_fallback, check_precise, detect,
};

//! Behavioural tests for the destructive-statement guard.

use pretty_assertions::assert_eq;
use qry_guardrails::{DestructiveKind, check_destructive, check_fallback, check_precise, detect};

/// Statements that at least one precise rule recognises.
const DESTRUCTIVE: &[&str] = &[
    "DROP TABLE users",
    "DROP TABLE IF EXISTS users;",
    "drop database analytics",
    "DROP SCHEMA staging CASCADE;",
    "DROP INDEX idx_orders_created_at",
    "TRUNCATE TABLE sessions",
    "truncate table audit.events;",
    "DELETE FROM users;",
    "delete from users",
    "SELECT 1; DELETE FROM users",
    "UPDATE users SET active = false",
    "update public.users set active = false;",
    "ALTER TABLE orders DROP COLUMN notes",
    "ALTER TABLE orders\n  DROP CONSTRAINT orders_pkey",
];

/// Statements that only the keyword fallback recognises.
const FALLBACK_ONLY: &[&str] = &[
    "TRUNCATE sessions",
    "DELETE\nFROM users\nRETURNING id",
    "UPDATE users u\nSET active = false",
    "DROP VIEW active_users",
    "DROP FUNCTION cleanup()",
];

const SAFE: &[&str] = &[
    "SELECT * FROM users",
    "SELECT id, email FROM users WHERE active = true ORDER BY id LIMIT 10",
    "DELETE FROM users WHERE id = 1;",
    "UPDATE users SET active = false WHERE last_login < now() - interval '1 year'",
    "INSERT INTO audit_log (event) VALUES ('login')",
    "SELECT updated_at, dropped_at FROM events",
];

#[test]
fn test_destructive_statements_warn() {
    for sql in DESTRUCTIVE {
        assert!(check_precise(sql).is_some(), "precise rules missed: {}", sql);
        assert!(!check_destructive(sql).is_empty(), "no warning for: {}", sql);
    }
}

#[test]
fn test_fallback_catches_irregular_shapes() {
    for sql in FALLBACK_ONLY {
        assert!(check_precise(sql).is_none(), "unexpected precise hit: {}", sql);
        let warning = detect(sql).unwrap_or_else(|| panic!("no warning for: {}", sql));
        assert_eq!(warning.kind, DestructiveKind::Fallback);
    }
}

#[test]
fn test_safe_statements_pass() {
    for sql in SAFE {
        assert_eq!(check_destructive(sql), "", "spurious warning for: {}", sql);
    }
}

#[test]
fn test_fallback_never_less_sensitive_than_precise() {
    for sql in DESTRUCTIVE.iter().chain(FALLBACK_ONLY).chain(SAFE) {
        if check_precise(sql).is_some() {
            assert!(
                check_fallback(sql).is_some(),
                "fallback missed a statement the precise rules caught: {}",
                sql
            );
        }
    }
}

#[test]
fn test_first_matching_rule_determines_message() {
    // Both DROP TABLE and an unscoped DELETE: DROP is checked first.
    let warning = detect("DROP TABLE a; DELETE FROM b").unwrap();
    assert_eq!(warning.kind, DestructiveKind::DropObject);
    assert_eq!(warning.message, "Destructive operation: DROP TABLE");
}

#[test]
fn test_empty_input() {
    assert_eq!(check_destructive(""), "");
    assert_eq!(check_destructive("   \n"), "");
}

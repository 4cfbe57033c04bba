//! Combined verdict for one generated statement.
//!
//! Callers that hand SQL back to a user need one answer: block it, show it with a warning, or
//! show it as is. [`Assessment`] combines the policy verdict, the enforcement mode and the
//! destructive-statement guard into that answer.

use crate::validator::Validator;
use crate::verdict::{ValidationVerdict, Violation};
use qry_guardrails::destructive;
use serde::Serialize;
use std::fmt;

/// What the caller should do with the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Pass the SQL through.
    Allow,
    /// Return the SQL together with a warning.
    Warn,
    /// Withhold the SQL and report an error.
    Block,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Allow => write!(f, "allow"),
            Action::Warn => write!(f, "warn"),
            Action::Block => write!(f, "block"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub action: Action,
    /// The SQL, withheld when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Error shown instead of the SQL when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Destructive-statement warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Policy violations reported without blocking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_warning: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl Assessment {
    /// Validate `sql` and run the destructive guard on it.
    pub fn evaluate(validator: &Validator, sql: &str) -> Self {
        let verdict = validator.validate(sql);
        Self::from_verdict(validator, verdict)
    }

    /// Combine an existing verdict with the enforcement mode and the destructive guard.
    pub fn from_verdict(validator: &Validator, verdict: ValidationVerdict) -> Self {
        if validator.is_blocked(&verdict) {
            tracing::info!(summary = %verdict.summary(), "blocking SQL");
            return Self {
                action: Action::Block,
                sql: None,
                error: Some(format!("Security violation: {}", verdict.summary())),
                warning: None,
                security_warning: None,
                violations: verdict.violations().to_vec(),
            };
        }

        let security_warning = validator
            .should_warn(&verdict)
            .then(|| verdict.error_message());
        let warning = destructive::detect(verdict.original_sql()).map(|w| w.message);

        let action = if security_warning.is_some() || warning.is_some() {
            Action::Warn
        } else {
            Action::Allow
        };

        Self {
            action,
            sql: Some(verdict.original_sql().to_string()),
            error: None,
            warning,
            security_warning,
            violations: verdict.violations().to_vec(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.action == Action::Block
    }
}

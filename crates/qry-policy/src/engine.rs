//! Reloadable policy holder.
//!
//! A [`PolicyEngine`] owns the current [`PolicySnapshot`], which pairs a policy with its compiled
//! validator. Snapshots are immutable and handed out as `Arc`s. [`PolicyEngine::reload`] builds
//! a new snapshot and swaps it in, so a validation that started before a reload finishes against
//! the snapshot it began with.

use crate::assessment::Assessment;
use crate::error::PolicyError;
use crate::prompt::{build_prompt_addition, build_prompt_summary};
use crate::validator::Validator;
use crate::verdict::ValidationVerdict;
use qry_core::{Mode, QryConfig, SecurityConfig};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable policy together with its compiled validator.
#[derive(Debug)]
pub struct PolicySnapshot {
    validator: Validator,
}

impl PolicySnapshot {
    pub fn new(config: Option<SecurityConfig>) -> Self {
        Self {
            validator: Validator::new(config),
        }
    }

    pub fn config(&self) -> Option<&SecurityConfig> {
        self.validator.config()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_active()
    }

    /// The enforcement mode. Warn when no policy is loaded.
    pub fn mode(&self) -> Mode {
        self.validator.mode().unwrap_or_default()
    }

    pub fn validate(&self, sql: &str) -> ValidationVerdict {
        self.validator.validate(sql)
    }

    pub fn is_blocked(&self, verdict: &ValidationVerdict) -> bool {
        self.validator.is_blocked(verdict)
    }

    pub fn should_warn(&self, verdict: &ValidationVerdict) -> bool {
        self.validator.should_warn(verdict)
    }

    pub fn prompt_addition(&self) -> String {
        build_prompt_addition(self.config())
    }

    pub fn prompt_summary(&self) -> String {
        build_prompt_summary(self.config())
    }

    pub fn assess(&self, sql: &str) -> Assessment {
        Assessment::evaluate(&self.validator, sql)
    }
}

/// Holds the current policy snapshot and swaps it on reload.
#[derive(Debug)]
pub struct PolicyEngine {
    current: RwLock<Arc<PolicySnapshot>>,
}

impl PolicyEngine {
    /// Create an engine for a policy. `None` disables validation.
    pub fn new(config: Option<SecurityConfig>) -> Self {
        let snapshot = PolicySnapshot::new(config);
        tracing::debug!(policy = %snapshot.prompt_summary(), "policy engine initialised");
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// An engine with no policy.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Create an engine from the `security` section of a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let config = QryConfig::from_file(path)?;
        Ok(Self::new(config.security_policy()))
    }

    /// The current snapshot. Holding it keeps that policy alive across reloads.
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        // Writers only replace the Arc, so a poisoned lock still holds a complete snapshot.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the policy. Snapshots already handed out are unaffected.
    pub fn reload(&self, config: Option<SecurityConfig>) {
        let snapshot = Arc::new(PolicySnapshot::new(config));
        tracing::info!(policy = %snapshot.prompt_summary(), "security policy reloaded");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Reload from a configuration file. On error the current policy stays in place.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<(), PolicyError> {
        let config = QryConfig::from_file(path)?;
        self.reload(config.security_policy());
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.snapshot().is_enabled()
    }

    pub fn config(&self) -> Option<SecurityConfig> {
        self.snapshot().config().cloned()
    }

    pub fn mode(&self) -> Mode {
        self.snapshot().mode()
    }

    pub fn validate(&self, sql: &str) -> ValidationVerdict {
        self.snapshot().validate(sql)
    }

    pub fn is_blocked(&self, verdict: &ValidationVerdict) -> bool {
        self.snapshot().is_blocked(verdict)
    }

    pub fn should_warn(&self, verdict: &ValidationVerdict) -> bool {
        self.snapshot().should_warn(verdict)
    }

    pub fn prompt_addition(&self) -> String {
        self.snapshot().prompt_addition()
    }

    pub fn prompt_summary(&self) -> String {
        self.snapshot().prompt_summary()
    }

    pub fn assess(&self, sql: &str) -> Assessment {
        self.snapshot().assess(sql)
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qry_core::ExcludeConfig;

    fn strict(tables: &[&str]) -> Option<SecurityConfig> {
        SecurityConfig::new(
            Mode::Strict,
            ExcludeConfig::new(
                tables.iter().copied(),
                Vec::<String>::new(),
                Vec::<String>::new(),
            ),
        )
    }

    #[test]
    fn test_disabled_engine() {
        let engine = PolicyEngine::disabled();
        assert!(!engine.is_enabled());
        assert_eq!(engine.mode(), Mode::Warn);
        assert!(engine.validate("SELECT * FROM secrets").is_valid());
        assert_eq!(engine.prompt_addition(), "");
    }

    #[test]
    fn test_reload_swaps_policy() {
        let engine = PolicyEngine::new(strict(&["secrets"]));
        assert!(!engine.validate("SELECT * FROM secrets").is_valid());

        engine.reload(strict(&["payroll"]));
        assert!(engine.validate("SELECT * FROM secrets").is_valid());
        assert!(!engine.validate("SELECT * FROM payroll").is_valid());
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let engine = PolicyEngine::new(strict(&["secrets"]));
        let before = engine.snapshot();

        engine.reload(None);

        assert!(!before.validate("SELECT * FROM secrets").is_valid());
        assert!(engine.validate("SELECT * FROM secrets").is_valid());
        assert!(!engine.is_enabled());
    }
}

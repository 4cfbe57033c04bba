//! Error types for the policy crate.

use qry_core::ConfigError;
use thiserror::Error;

/// Errors raised while (re)loading a policy. Validation itself never fails.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configuration file could not be read or parsed.
    #[error("failed to load security policy: {0}")]
    Config(#[from] ConfigError),
}

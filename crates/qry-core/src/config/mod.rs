//! Configuration types for qry.
//!
//! Configuration is read from a single YAML file, `.qry.yaml` in the working directory by
//! default. The file is shared with the collaborators that generate SQL (backend selection,
//! dialect, session settings, ...). Only the `security` section is interpreted here; every other
//! key is accepted and ignored.
//!
//! ```yaml
//! security:
//!   mode: strict
//!   exclude:
//!     tables: [secrets, audit_log]
//!     columns: [ssn]
//!     patterns: ["*_pii", "api_*"]
//! ```

pub mod security;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use security::{
    ExcludeConfig, Mode, RawExcludeSettings, RawSecuritySettings, SecurityConfig,
};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".qry.yaml";

/// Complete qry configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QryConfig {
    /// Raw `security` section, exactly as written in the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<RawSecuritySettings>,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QryConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    ///
    /// An empty document yields the default (policy-free) configuration.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load `.qry.yaml` from `dir`, falling back to the default configuration when the file
    /// does not exist. A file that exists but cannot be read or parsed is still an error.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = Self::default_path(dir);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Path of the default configuration file inside `dir`.
    pub fn default_path(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(DEFAULT_CONFIG_FILE)
    }

    /// Resolve the effective security policy.
    ///
    /// Returns `None` when there is no `security` section or when it excludes nothing.
    pub fn security_policy(&self) -> Option<SecurityConfig> {
        SecurityConfig::load(self.security.as_ref())
    }
}

//! Core types shared across the qry crates.
//!
//! Currently this is the configuration layer: the `.qry.yaml` file as a whole and the
//! `security` section that drives the SQL access-control policy.

pub mod config;

pub use config::{
    ConfigError, ExcludeConfig, Mode, QryConfig, RawExcludeSettings, RawSecuritySettings,
    SecurityConfig,
};

//! `qry` subcommands and the input handling they share.

pub mod check;
pub mod policy;
pub mod prompt;
pub mod refs;

use crate::{ConfigArgs, SqlArgs};
use anyhow::{Context, Result};
use qry_core::QryConfig;
use qry_policy::PolicyEngine;
use std::io::Read;
use std::path::Path;

/// Load the configuration named by `--config`, or discover `.qry.yaml` in the working
/// directory. A missing default file means no policy; a missing explicit file is an error.
pub fn load_config(args: &ConfigArgs) -> Result<QryConfig> {
    match &args.config {
        Some(path) => QryConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            QryConfig::discover(&cwd)
                .with_context(|| format!("Failed to load {:?}", QryConfig::default_path(&cwd)))
        }
    }
}

pub fn load_engine(args: &ConfigArgs) -> Result<PolicyEngine> {
    let config = load_config(args)?;
    let engine = PolicyEngine::new(config.security_policy());
    tracing::debug!(policy = %engine.prompt_summary(), "loaded policy");
    Ok(engine)
}

/// The statement to work on, from the argument, `--file`, or stdin.
pub fn read_sql(args: &SqlArgs) -> Result<String> {
    let sql = match (&args.sql, &args.file) {
        (Some(sql), _) => sql.clone(),
        (None, Some(path)) => read_sql_file(path)?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read SQL from stdin")?;
            buf
        }
    };

    let sql = sql.trim();
    if sql.is_empty() {
        anyhow::bail!("No SQL given: pass a statement, --file, or pipe it on stdin");
    }
    Ok(sql.to_string())
}

fn read_sql_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read SQL file: {:?}", path))
}

//! `qry check` command implementation.
//!
//! Runs a statement through the policy and the destructive-statement guard, the same way a
//! caller embedding the library would before showing SQL to a user:
//! - blocked SQL is withheld and the command exits with [`BLOCKED_EXIT_CODE`]
//! - warned SQL is printed together with its warnings
//! - anything else is printed as is

use super::{load_engine, read_sql};
use crate::{ConfigArgs, SqlArgs};
use anyhow::Result;
use qry_policy::{Action, Assessment};
use std::process::ExitCode;

/// Exit status when the policy blocks the statement.
pub const BLOCKED_EXIT_CODE: u8 = 2;

pub fn run(sql_args: &SqlArgs, config_args: &ConfigArgs, json: bool) -> Result<ExitCode> {
    let engine = load_engine(config_args)?;
    let sql = read_sql(sql_args)?;
    let assessment = engine.assess(&sql);

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print_assessment(&assessment);
    }

    Ok(ExitCode::from(exit_status(&assessment)))
}

fn exit_status(assessment: &Assessment) -> u8 {
    if assessment.is_blocked() {
        BLOCKED_EXIT_CODE
    } else {
        0
    }
}

fn print_assessment(assessment: &Assessment) {
    match assessment.action {
        Action::Block => {
            if let Some(error) = &assessment.error {
                println!("❌ {}", error);
            }
            for violation in &assessment.violations {
                println!("   • {}", violation);
            }
        }
        Action::Warn | Action::Allow => {
            if let Some(sql) = &assessment.sql {
                println!("{}", sql);
            }
            if let Some(warning) = &assessment.security_warning {
                println!();
                println!("⚠️  {}", warning.trim_end());
            }
            if let Some(warning) = &assessment.warning {
                println!();
                println!("⚠️  {}", warning);
            }
        }
    }
}

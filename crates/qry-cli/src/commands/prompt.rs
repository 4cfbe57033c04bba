//! `qry prompt` - print the instructions appended to the SQL generation prompt.

use super::load_engine;
use crate::ConfigArgs;
use anyhow::Result;

pub fn run(config_args: &ConfigArgs) -> Result<()> {
    let engine = load_engine(config_args)?;
    let addition = engine.prompt_addition();
    if addition.is_empty() {
        tracing::info!("no active security policy, prompt is unchanged");
        return Ok(());
    }
    print!("{}", addition);
    Ok(())
}

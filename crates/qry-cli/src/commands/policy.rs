//! `qry policy` - show the resolved security policy.

use super::load_engine;
use crate::ConfigArgs;
use anyhow::Result;
use qry_policy::PolicySnapshot;

pub fn run(config_args: &ConfigArgs) -> Result<()> {
    let engine = load_engine(config_args)?;
    let snapshot = engine.snapshot();

    println!("{}", snapshot.prompt_summary());

    let Some(config) = snapshot.config() else {
        return Ok(());
    };

    let dropped = dropped_patterns(&snapshot);
    if dropped > 0 {
        println!("⚠️  {} pattern(s) could not be compiled and are ignored", dropped);
    }

    println!();
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

/// Configured patterns that did not make it into the compiled matcher.
fn dropped_patterns(snapshot: &PolicySnapshot) -> usize {
    let configured = snapshot.config().map_or(0, |c| c.exclude.patterns.len());
    configured.saturating_sub(snapshot.validator().matcher().pattern_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qry_core::{ExcludeConfig, Mode, SecurityConfig};

    fn snapshot(patterns: &[&str]) -> PolicySnapshot {
        PolicySnapshot::new(SecurityConfig::new(
            Mode::Strict,
            ExcludeConfig::new(
                Vec::<String>::new(),
                Vec::<String>::new(),
                patterns.iter().copied(),
            ),
        ))
    }

    #[test]
    fn test_no_dropped_patterns() {
        assert_eq!(dropped_patterns(&snapshot(&["*_pii", "api_?"])), 0);
        assert_eq!(dropped_patterns(&PolicySnapshot::new(None)), 0);
    }

    #[test]
    fn test_oversized_pattern_counts_as_dropped() {
        let huge = "?".repeat(2_000_000);
        let snapshot = snapshot(&[huge.as_str(), "*_pii"]);
        assert_eq!(dropped_patterns(&snapshot), 1);
        assert!(!snapshot.validate("SELECT user_pii FROM t").is_valid());
    }
}

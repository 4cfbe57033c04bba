//! Prompt text describing the active policy.
//!
//! The addition is appended to the request sent to the SQL generator so that it avoids
//! excluded data in the first place. It is advisory only: generated SQL must still go through
//! [`crate::Validator`].

use qry_core::SecurityConfig;

/// The reply the generator is told to give when a request needs forbidden data.
pub const REFUSAL_MESSAGE: &str = "Cannot generate this query: it would access restricted data.";

/// Render the policy as prompt instructions.
///
/// Returns an empty string when there is no active policy. The output is deterministic:
/// entries appear in configuration order and empty categories are omitted.
pub fn build_prompt_addition(config: Option<&SecurityConfig>) -> String {
    let Some(config) = config.filter(|c| c.is_active()) else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str("\n\nSECURITY RULES (MUST FOLLOW):\n");
    out.push_str("You must NEVER access, query, or return data from the following:\n");

    let sections = [
        ("Forbidden tables:", &config.exclude.tables),
        ("Forbidden columns:", &config.exclude.columns),
        (
            "Forbidden patterns (any table/column matching):",
            &config.exclude.patterns,
        ),
    ];
    for (heading, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", heading));
        for entry in entries {
            out.push_str(&format!("  - {}\n", entry));
        }
    }

    out.push_str(&format!(
        "\nIf a query requires accessing forbidden data, respond with: \"{}\"\n",
        REFUSAL_MESSAGE
    ));
    out
}

/// One-line description of the policy for logs.
pub fn build_prompt_summary(config: Option<&SecurityConfig>) -> String {
    let Some(config) = config.filter(|c| c.is_active()) else {
        return "security: disabled".to_string();
    };

    let counts = [
        (config.exclude.tables.len(), "tables"),
        (config.exclude.columns.len(), "columns"),
        (config.exclude.patterns.len(), "patterns"),
    ];
    let parts: Vec<String> = counts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();

    format!(
        "security: {} mode, excluding {}",
        config.mode,
        parts.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qry_core::{ExcludeConfig, Mode};

    #[test]
    fn test_absent_policy() {
        assert_eq!(build_prompt_addition(None), "");
        assert_eq!(build_prompt_summary(None), "security: disabled");
    }

    #[test]
    fn test_addition_layout() {
        let config = SecurityConfig::new(
            Mode::Strict,
            ExcludeConfig::new(["secrets"], Vec::<String>::new(), ["*_pii"]),
        )
        .unwrap();
        let expected = "\n\nSECURITY RULES (MUST FOLLOW):\n\
            You must NEVER access, query, or return data from the following:\n\
            \n\
            Forbidden tables:\n\
            \x20 - secrets\n\
            \n\
            Forbidden patterns (any table/column matching):\n\
            \x20 - *_pii\n\
            \n\
            If a query requires accessing forbidden data, respond with: \
            \"Cannot generate this query: it would access restricted data.\"\n";
        assert_eq!(build_prompt_addition(Some(&config)), expected);
    }

    #[test]
    fn test_summary_counts() {
        let config = SecurityConfig::new(
            Mode::Warn,
            ExcludeConfig::new(["a", "b"], ["c"], Vec::<String>::new()),
        )
        .unwrap();
        assert_eq!(
            build_prompt_summary(Some(&config)),
            "security: warn mode, excluding 2 tables, 1 columns"
        );
    }

    #[test]
    fn test_disabled_policy_adds_nothing() {
        let mut config =
            SecurityConfig::new(Mode::Strict, ExcludeConfig::new(["a"], ["b"], ["c*"])).unwrap();
        config.enabled = false;
        assert_eq!(build_prompt_addition(Some(&config)), "");
        assert_eq!(build_prompt_summary(Some(&config)), "security: disabled");
    }
}

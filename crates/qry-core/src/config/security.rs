//! Security policy configuration.
//!
//! The `security` section of `.qry.yaml` names tables, columns and wildcard patterns that
//! generated SQL must never touch, plus the enforcement mode applied when it does.
//!
//! Two layers live here:
//! - [`RawSecuritySettings`] mirrors the file verbatim (every field optional).
//! - [`SecurityConfig`] is the validated, immutable policy produced by [`SecurityConfig::load`].
//!   A policy that excludes nothing is never constructed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// How violations are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Block SQL with violations.
    Strict,
    /// Report violations but still return the SQL.
    #[default]
    Warn,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Strict => "strict",
            Mode::Warn => "warn",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Mode::Strict),
            "warn" => Ok(Mode::Warn),
            other => Err(ConfigError::Config(format!(
                "unknown security mode '{}': expected 'strict' or 'warn'",
                other
            ))),
        }
    }
}

/// The `security` section as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSecuritySettings {
    /// Explicit on/off switch. Absent means on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// `strict` or `warn`. Kept as a string so that an unknown value degrades instead of
    /// failing the whole file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Exclusion lists.
    #[serde(default)]
    pub exclude: RawExcludeSettings,
}

/// The `security.exclude` section as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExcludeSettings {
    /// Exact table names.
    #[serde(default, deserialize_with = "string_or_list")]
    pub tables: Vec<String>,

    /// Exact column names.
    #[serde(default, deserialize_with = "string_or_list")]
    pub columns: Vec<String>,

    /// Wildcard patterns (`*` any run, `?` one character) applied to tables and columns.
    #[serde(default, deserialize_with = "string_or_list")]
    pub patterns: Vec<String>,
}

/// An exclusion list may be written as a YAML list or as a single string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    /// Whitespace-separated names, e.g. `tables: secrets audit_log`.
    One(String),
    List(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) => s.split_whitespace().map(str::to_string).collect(),
        Some(StringOrList::List(items)) => items,
    })
}

/// What a policy excludes.
///
/// Names keep the spelling and order of the configuration file; duplicates that differ only in
/// case are collapsed to their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeConfig {
    pub tables: Vec<String>,
    pub columns: Vec<String>,
    pub patterns: Vec<String>,
}

impl ExcludeConfig {
    /// Build an exclusion set, trimming entries and dropping blanks and duplicates.
    pub fn new<T, C, P>(tables: T, columns: C, patterns: P) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            tables: normalize_names(tables, true),
            columns: normalize_names(columns, true),
            patterns: normalize_names(patterns, false),
        }
    }

    /// True when there is at least one table, column or pattern.
    pub fn has_exclusions(&self) -> bool {
        !self.tables.is_empty() || !self.columns.is_empty() || !self.patterns.is_empty()
    }
}

/// A validated security policy.
///
/// Immutable once built: a reload produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enabled: bool,
    pub mode: Mode,
    pub exclude: ExcludeConfig,
}

impl SecurityConfig {
    /// Build a policy from a mode and exclusion set.
    ///
    /// Returns `None` when nothing is excluded.
    pub fn new(mode: Mode, exclude: ExcludeConfig) -> Option<Self> {
        if !exclude.has_exclusions() {
            return None;
        }
        Some(Self {
            enabled: true,
            mode,
            exclude,
        })
    }

    /// Resolve raw settings into a policy.
    ///
    /// - No settings at all yields `None`.
    /// - A missing mode defaults to [`Mode::Warn`]; an unrecognised one degrades to `Warn`.
    /// - Empty exclusion lists yield `None` whatever `enabled` says.
    pub fn load(raw: Option<&RawSecuritySettings>) -> Option<Self> {
        let raw = raw?;

        let mode = match raw.mode.as_deref().map(str::trim) {
            None | Some("") => Mode::default(),
            Some(value) => value.parse().unwrap_or_else(|e: ConfigError| {
                tracing::warn!(error = %e, "falling back to warn mode");
                Mode::Warn
            }),
        };

        let exclude = ExcludeConfig::new(
            raw.exclude.tables.iter().cloned(),
            raw.exclude.columns.iter().cloned(),
            raw.exclude.patterns.iter().cloned(),
        );

        let mut config = Self::new(mode, exclude)?;
        config.enabled = raw.enabled.unwrap_or(true);
        Some(config)
    }

    /// True when the policy should actually be enforced.
    pub fn is_active(&self) -> bool {
        self.enabled && self.exclude.has_exclusions()
    }

    pub fn is_strict(&self) -> bool {
        self.mode == Mode::Strict
    }

    pub fn is_warn(&self) -> bool {
        self.mode == Mode::Warn
    }

    pub fn has_exclusions(&self) -> bool {
        self.exclude.has_exclusions()
    }
}

fn normalize_names<I>(items: I, case_insensitive: bool) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item: String = item.into();
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = if case_insensitive {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };
        if seen.insert(key) {
            out.push(trimmed.to_string());
        }
    }
    out
}

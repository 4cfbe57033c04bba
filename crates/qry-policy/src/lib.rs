//! # qry-policy
//!
//! SQL access-control policy for generated queries.
//!
//! Given a statement produced by an untrusted SQL generator, this crate decides whether it
//! references excluded tables or columns and what the caller should do about it.
//!
//! - [`extractor`] scans SQL for table and column references. It is a regex heuristic, not a
//!   parser, and sits behind the [`ReferenceExtractor`] trait.
//! - [`matcher`] compiles a [`SecurityConfig`](qry_core::SecurityConfig) into exact-name sets
//!   and anchored wildcard patterns.
//! - [`validator`] runs extraction and matching and produces a [`ValidationVerdict`].
//! - [`prompt`] renders the policy as instructions for the generator.
//! - [`engine`] holds the current policy and swaps it atomically on reload.
//! - [`assessment`] combines the verdict, the enforcement mode and the destructive guard into
//!   a single block / warn / allow answer.
//!
//! ```
//! use qry_core::QryConfig;
//! use qry_policy::{Action, PolicyEngine};
//!
//! let config = QryConfig::from_yaml(
//!     "security:\n  mode: strict\n  exclude:\n    tables: [secrets]\n",
//! )
//! .unwrap();
//! let engine = PolicyEngine::new(config.security_policy());
//!
//! assert_eq!(engine.assess("SELECT * FROM secrets").action, Action::Block);
//! assert_eq!(engine.assess("SELECT id FROM users").action, Action::Allow);
//! ```

pub mod assessment;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod keywords;
pub mod matcher;
pub mod prompt;
pub mod reference;
pub mod validator;
pub mod verdict;

pub use assessment::{Action, Assessment};
pub use engine::{PolicyEngine, PolicySnapshot};
pub use error::PolicyError;
pub use extractor::{HeuristicExtractor, ReferenceExtractor, extract_references};
pub use matcher::CompiledMatcher;
pub use prompt::{REFUSAL_MESSAGE, build_prompt_addition, build_prompt_summary};
pub use reference::{ReferenceKind, SqlReference};
pub use validator::Validator;
pub use verdict::{ValidationVerdict, Violation};

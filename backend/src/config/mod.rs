//! Rule-table configuration for the planner.
//!
//! # Architecture
//!
//! ```text
//! configs/*.yaml ──► ConfigLoader::load_all ──► ConfigTables (raw, keyed by stem)
//!                                                     │
//!                         PlannerConfig::from_tables ◄┘
//!                           - lenient numeric decoding
//!                           - dependency rules compiled to typed FieldPaths
//!                           - cross-reference validation
//!                           - SHA-256 fingerprint
//! ```
//!
//! The planning engine only ever sees a [`PlannerConfig`]; it never re-validates.

pub mod checksum;
pub mod error;
pub mod field_path;
pub mod lenient;
pub mod loader;
pub mod rules;
pub mod tables;
pub mod validation;

pub use checksum::calculate_checksum;
pub use error::{ConfigError, ConfigResult};
pub use field_path::{FieldPath, FieldValue};
pub use loader::{ConfigLoader, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILES};
pub use rules::{Clause, DependencyRule, FailOutcome, RuleFilter};
pub use tables::{
    CadencePolicy, ConfigTables, PlannerConfig, PlannerSettings, PlatformWeights, PushWindow,
};

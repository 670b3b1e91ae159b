//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flag overrides
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a run starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{BackoffConfig, BackoffStrategy, GateConfig, LogFormat, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};

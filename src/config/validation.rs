//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempt budget > 0, timeout > 0, status codes)
//! - Detect conflicting status sets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before any probe attempt is made

use thiserror::Error;

use crate::config::schema::{BackoffStrategy, GateConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("status code {0} is outside 100..=599")]
    InvalidStatus(u16),

    #[error("status code {0} is both accepted and fatal")]
    ConflictingStatus(u16),

    #[error("backoff max_delay_ms ({max_delay_ms}) is below delay_ms ({delay_ms})")]
    BackoffCapBelowDelay { delay_ms: u64, max_delay_ms: u64 },

    #[error("path must start with '/': {0:?}")]
    InvalidPath(String),
}

/// Comma-separated rendering of a list of errors.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }

    if config.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for &code in config.accepted_statuses.iter().chain(&config.fatal_statuses) {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatus(code));
        }
    }

    for &code in &config.fatal_statuses {
        if config.accepted_statuses.contains(&code) {
            errors.push(ValidationError::ConflictingStatus(code));
        }
    }

    if config.backoff.strategy == BackoffStrategy::Exponential
        && config.backoff.max_delay_ms < config.delay_ms
    {
        errors.push(ValidationError::BackoffCapBelowDelay {
            delay_ms: config.delay_ms,
            max_delay_ms: config.backoff.max_delay_ms,
        });
    }

    if let Some(path) = &config.path {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidPath(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a gate run.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Root configuration for a health gate run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Hard ceiling on probe attempts.
    pub max_attempts: u32,

    /// Wait between a failed attempt and the next, in milliseconds.
    pub delay_ms: u64,

    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,

    /// Path appended to a target that has none (e.g. "/health").
    pub path: Option<String>,

    /// Statuses counted as ready. Empty means the 2xx range.
    pub accepted_statuses: Vec<u16>,

    /// Statuses that end the run immediately with an error.
    pub fatal_statuses: Vec<u16>,

    /// Delay growth between attempts.
    pub backoff: BackoffConfig,

    /// Optional append-only attempt log (JSON lines).
    pub attempt_log: Option<PathBuf>,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay_ms: 2_000,
            timeout_ms: 5_000,
            path: None,
            accepted_statuses: Vec::new(),
            fatal_statuses: Vec::new(),
            backoff: BackoffConfig::default(),
            attempt_log: None,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GateConfig {
    /// Inter-attempt delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How the inter-attempt delay evolves across a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same delay after every failed attempt.
    #[default]
    Fixed,
    /// Delay doubles after every failed attempt, capped at `max_delay_ms`.
    Exponential,
}

/// Backoff configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub strategy: BackoffStrategy,

    /// Upper bound for exponential growth in milliseconds.
    pub max_delay_ms: u64,

    /// Add up to 10% random jitter on top of the computed delay.
    pub jitter: bool,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffStrategy::Fixed,
            max_delay_ms: 30_000,
            jitter: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Write a Prometheus text snapshot here when the run ends.
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            metrics_textfile: None,
        }
    }
}

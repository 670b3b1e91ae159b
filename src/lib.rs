//! Health Gate Library
//!
//! Bounded-retry readiness probing for freshly deployed HTTP services.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod report;
pub mod resilience;
pub mod service;

pub use config::schema::GateConfig;
pub use health::{FinalOutcome, HealthGate, RunResult};
pub use lifecycle::{CancelSignal, Cancellation};

//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe attempt:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On transient failure: backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every probe has a deadline
//! - A timed-out attempt consumes budget like any other failure
//! - Backoff never shortens the configured base delay

pub mod backoff;
pub mod timeouts;

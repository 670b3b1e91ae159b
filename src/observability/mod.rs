//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate run produces:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, histograms; optional textfile)
//!     → attempt_log.rs (one JSON line per attempt)
//! ```
//!
//! # Design Decisions
//! - Every attempt is logged with its run ID
//! - Observability failures never change a run's outcome

pub mod attempt_log;
pub mod logging;
pub mod metrics;

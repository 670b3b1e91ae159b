//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Cancellation::cancel
//!
//! Cancellation (cancel.rs):
//!     Cancellation (owner) ──watch──▶ CancelSignal (gate, demo service)
//! ```
//!
//! # Design Decisions
//! - Cancellation is cooperative: checked before each attempt, raced
//!   against in-flight attempts and waits
//! - A raised flag stays raised; late subscribers still observe it

pub mod cancel;
pub mod signals;

pub use cancel::{CancelSignal, Cancellation};

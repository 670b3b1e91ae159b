//! Health gating subsystem.
//!
//! # Data Flow
//! ```text
//! target string + GateConfig
//!     → target.rs (parse & validate address)
//!     → gate.rs (bounded attempt loop)
//!         → probe.rs (one request through the Transport)
//!         → predicate.rs (Ready / NotReady / Fatal)
//!         → attempt.rs (recorded ProbeAttempt)
//!     → RunResult (terminal outcome + attempt log)
//! ```
//!
//! # Design Decisions
//! - The transport is a seam; the gate never performs I/O itself
//! - Nothing is shared between runs; concurrent runs need separate targets only

pub mod attempt;
pub mod gate;
pub mod predicate;
pub mod probe;
pub mod target;

pub use attempt::{AttemptOutcome, ProbeAttempt, ProbeObservation};
pub use gate::{AttemptEvent, AttemptObserver, FinalOutcome, GateError, HealthGate, RunResult};
pub use predicate::{SuccessPredicate, Verdict};
pub use probe::{HttpTransport, ProbeError, Transport};
pub use target::{Target, TargetError};

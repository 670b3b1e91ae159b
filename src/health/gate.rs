//! Bounded-retry health gate.
//!
//! # Responsibilities
//! - Probe a target sequentially until it is ready, the attempt budget is
//!   spent, a non-retryable condition is hit, or the run is cancelled
//! - Record every completed attempt and notify observers as it happens
//! - Report a single terminal outcome
//!
//! # Algorithm
//! ```text
//! validate config, parse target   → Error (no attempts) on failure
//! for n in 1..=max_attempts:
//!     cancelled?                  → Cancelled
//!     probe, bounded by timeout   (cancellation abandons the attempt)
//!     classify, record, notify
//!     Success                     → Success
//!     Error                       → Error
//!     last attempt                → ExhaustedRetries (no wait)
//!     wait delay                  (cancellation ends the wait)
//! ```
//!
//! # Design Decisions
//! - Exactly one probe in flight per run
//! - A timed-out attempt consumes budget
//! - The delay is measured from the end of the failed attempt

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::validation::describe;
use crate::config::{validate_config, GateConfig, ValidationError};
use crate::health::attempt::{serialize_millis, AttemptOutcome, ProbeAttempt};
use crate::health::predicate::{SuccessPredicate, Verdict};
use crate::health::probe::{HttpTransport, Transport};
use crate::health::target::{Target, TargetError};
use crate::lifecycle::CancelSignal;
use crate::observability::metrics;
use crate::resilience::backoff::DelaySchedule;
use crate::resilience::timeouts;

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalOutcome {
    Success,
    ExhaustedRetries,
    Cancelled,
    Error,
}

impl FinalOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalOutcome::Success => "success",
            FinalOutcome::ExhaustedRetries => "exhausted_retries",
            FinalOutcome::Cancelled => "cancelled",
            FinalOutcome::Error => "error",
        }
    }
}

/// Why a run ended with `FinalOutcome::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("invalid configuration: {}", describe(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("attempt {attempt}: {reason}")]
    NonRetryable { attempt: u32, reason: String },
}

impl GateError {
    /// Rejected before any attempt was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, GateError::InvalidTarget(_) | GateError::InvalidConfig(_))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub target: String,
    pub final_outcome: FinalOutcome,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<GateError>,
    pub attempts: Vec<ProbeAttempt>,
    #[serde(rename = "total_elapsed_ms", serialize_with = "serialize_millis")]
    pub total_elapsed: Duration,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.final_outcome == FinalOutcome::Success
    }
}

fn serialize_error<S>(error: &Option<GateError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Per-attempt notification handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct AttemptEvent<'a> {
    pub run_id: Uuid,
    pub attempt: &'a ProbeAttempt,
    /// Configured `max_attempts`.
    pub budget: u32,
}

/// Receives each attempt as soon as it is recorded.
pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, event: &AttemptEvent<'_>);
}

/// The gate itself. Cheap to share; runs hold no state on it.
pub struct HealthGate<T = HttpTransport> {
    transport: T,
    config: GateConfig,
    predicate: SuccessPredicate,
    observers: Vec<Arc<dyn AttemptObserver>>,
}

impl HealthGate<HttpTransport> {
    /// Gate over plain HTTP.
    pub fn http(config: GateConfig) -> Self {
        Self::new(HttpTransport::new(), config)
    }
}

impl<T: Transport> HealthGate<T> {
    pub fn new(transport: T, config: GateConfig) -> Self {
        let predicate = SuccessPredicate::from_statuses(
            config.accepted_statuses.clone(),
            config.fatal_statuses.clone(),
        );

        Self {
            transport,
            config,
            predicate,
            observers: Vec::new(),
        }
    }

    /// Replace the status-set predicate built from the config.
    pub fn with_predicate(mut self, predicate: SuccessPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Register an observer notified after every attempt.
    pub fn observe(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the gate against `target` until a terminal outcome.
    pub async fn probe(&self, target: &str, cancel: &CancelSignal) -> RunResult {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("gate", %run_id, target = %target);

        let result = self.run(run_id, target, cancel).instrument(span).await;
        metrics::record_run(result.final_outcome);
        result
    }

    async fn run(&self, run_id: Uuid, input: &str, cancel: &CancelSignal) -> RunResult {
        let started = Instant::now();
        let mut run = Run {
            run_id,
            target: input.trim().to_string(),
            attempts: Vec::new(),
            started,
        };

        // 1. Fail fast on config and target
        if let Err(errors) = validate_config(&self.config) {
            tracing::error!(errors = ?errors, "Configuration rejected");
            return run.finish(FinalOutcome::Error, Some(GateError::InvalidConfig(errors)));
        }

        let target = match Target::parse(input, self.config.path.as_deref()) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(error = %e, "Target rejected");
                return run.finish(FinalOutcome::Error, Some(GateError::InvalidTarget(e)));
            }
        };
        run.target = target.to_string();

        let budget = self.config.max_attempts;
        let timeout = self.config.timeout();
        let schedule = DelaySchedule::new(self.config.delay(), &self.config.backoff);

        tracing::info!(
            budget,
            timeout_ms = self.config.timeout_ms,
            delay_ms = self.config.delay_ms,
            "Health gate starting"
        );

        // 2. Sequential attempts
        for sequence_number in 1..=budget {
            if cancel.is_cancelled() {
                tracing::warn!(attempt = sequence_number, "Cancelled before attempt");
                return run.finish(FinalOutcome::Cancelled, None);
            }

            let observed_at = Utc::now();
            let attempt_started = Instant::now();

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!(attempt = sequence_number, "Cancelled during attempt, abandoning it");
                    return run.finish(FinalOutcome::Cancelled, None);
                }
                response = timeouts::bounded(timeout, self.transport.probe(&target)) => response,
            };

            let latency = attempt_started.elapsed();
            let (outcome, status, detail) = match response {
                Ok(observation) => {
                    let outcome = match self.predicate.evaluate(&observation) {
                        Verdict::Ready => AttemptOutcome::Success,
                        Verdict::NotReady => AttemptOutcome::TransientFailure,
                        Verdict::Fatal => AttemptOutcome::Error,
                    };
                    (outcome, Some(observation.status), None)
                }
                Err(e) if e.is_retryable() => {
                    (AttemptOutcome::TransientFailure, None, Some(e.to_string()))
                }
                Err(e) => (AttemptOutcome::Error, None, Some(e.to_string())),
            };

            let attempt = ProbeAttempt {
                sequence_number,
                target: run.target.clone(),
                outcome,
                status,
                detail,
                observed_at,
                latency,
            };
            self.record(&run, &attempt, budget);
            run.attempts.push(attempt);

            match outcome {
                AttemptOutcome::Success => {
                    tracing::info!(attempts = sequence_number, "Target is ready");
                    return run.finish(FinalOutcome::Success, None);
                }
                AttemptOutcome::Error => {
                    let reason = match (status, run.last_detail()) {
                        (Some(code), _) => format!("fatal status {}", code),
                        (None, Some(detail)) => detail.to_string(),
                        (None, None) => "non-retryable failure".to_string(),
                    };
                    tracing::error!(attempt = sequence_number, reason = %reason, "Non-retryable failure");
                    let error = GateError::NonRetryable {
                        attempt: sequence_number,
                        reason,
                    };
                    return run.finish(FinalOutcome::Error, Some(error));
                }
                AttemptOutcome::TransientFailure if sequence_number == budget => break,
                AttemptOutcome::TransientFailure => {
                    let delay = schedule.delay_after(sequence_number);
                    tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before next attempt");

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::warn!(attempt = sequence_number, "Cancelled while waiting");
                            return run.finish(FinalOutcome::Cancelled, None);
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        tracing::warn!(attempts = budget, "Attempt budget exhausted");
        run.finish(FinalOutcome::ExhaustedRetries, None)
    }

    fn record(&self, run: &Run, attempt: &ProbeAttempt, budget: u32) {
        tracing::info!(
            attempt = attempt.sequence_number,
            budget,
            outcome = attempt.outcome.as_str(),
            status = attempt.status,
            detail = attempt.detail.as_deref(),
            latency_ms = attempt.latency.as_millis() as u64,
            "Probe attempt completed"
        );
        metrics::record_attempt(attempt.outcome, attempt.latency);

        let event = AttemptEvent {
            run_id: run.run_id,
            attempt,
            budget,
        };
        for observer in &self.observers {
            observer.on_attempt(&event);
        }
    }
}

/// Mutable state of one run; only ever appended to.
struct Run {
    run_id: Uuid,
    target: String,
    attempts: Vec<ProbeAttempt>,
    started: Instant,
}

impl Run {
    fn last_detail(&self) -> Option<&str> {
        self.attempts.last().and_then(|a| a.detail.as_deref())
    }

    fn finish(self, final_outcome: FinalOutcome, error: Option<GateError>) -> RunResult {
        RunResult {
            run_id: self.run_id,
            target: self.target,
            final_outcome,
            error,
            attempts: self.attempts,
            total_elapsed: self.started.elapsed(),
        }
    }
}

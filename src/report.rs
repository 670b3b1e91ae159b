//! Operator-facing output.
//!
//! # Responsibilities
//! - Stream one progress line per attempt while the gate blocks
//! - Render the final summary (text or JSON)
//! - Map terminal outcomes to process exit codes
//!
//! # Design Decisions
//! - Progress lines are part of the contract, independent of log level
//! - Every terminal outcome has its own exit code so a pipeline can tell
//!   "gave up" from "was aborted"

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use crate::health::attempt::{AttemptOutcome, ProbeAttempt};
use crate::health::gate::{AttemptEvent, AttemptObserver, FinalOutcome, RunResult};

pub const PREFIX: &str = "[health-gate]";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_EXHAUSTED: u8 = 1;
pub const EXIT_INVALID: u8 = 2;
pub const EXIT_ERROR: u8 = 3;
pub const EXIT_CANCELLED: u8 = 4;

/// Process exit status for a finished run.
pub fn exit_code(result: &RunResult) -> u8 {
    match result.final_outcome {
        FinalOutcome::Success => EXIT_SUCCESS,
        FinalOutcome::ExhaustedRetries => EXIT_EXHAUSTED,
        FinalOutcome::Cancelled => EXIT_CANCELLED,
        FinalOutcome::Error => match &result.error {
            Some(e) if e.is_validation() => EXIT_INVALID,
            _ => EXIT_ERROR,
        },
    }
}

/// `[health-gate] attempt 2/30 http://host/health -> transient failure (HTTP 503) in 12ms`
pub fn progress_line(attempt: &ProbeAttempt, budget: u32) -> String {
    let observed = match (attempt.status, attempt.detail.as_deref()) {
        (Some(status), _) => format!(" (HTTP {})", status),
        (None, Some(detail)) => format!(" ({})", detail),
        (None, None) => String::new(),
    };

    let outcome = match attempt.outcome {
        AttemptOutcome::Success => "ready",
        AttemptOutcome::TransientFailure => "transient failure",
        AttemptOutcome::Error => "error",
    };

    format!(
        "{} attempt {}/{} {} -> {}{} in {}",
        PREFIX,
        attempt.sequence_number,
        budget,
        attempt.target,
        outcome,
        observed,
        format_duration(attempt.latency),
    )
}

/// One-line text summary of a finished run.
pub fn summary_line(result: &RunResult) -> String {
    let count = result.attempts.len();
    let elapsed = format_duration(result.total_elapsed);

    match result.final_outcome {
        FinalOutcome::Success => format!(
            "{} {} is ready after {} attempt(s) in {}",
            PREFIX, result.target, count, elapsed
        ),
        FinalOutcome::ExhaustedRetries => format!(
            "{} {} did not become ready: gave up after {} attempt(s) in {}",
            PREFIX, result.target, count, elapsed
        ),
        FinalOutcome::Cancelled => format!(
            "{} cancelled after {} attempt(s) in {}",
            PREFIX, count, elapsed
        ),
        FinalOutcome::Error => {
            let reason = result
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown error".to_string());
            format!("{} error after {} attempt(s): {}", PREFIX, count, reason)
        }
    }
}

/// Pretty JSON rendering of a finished run.
pub fn summary_json(result: &RunResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

/// Writes a progress line per attempt.
pub struct ProgressPrinter<W> {
    out: Mutex<W>,
}

impl ProgressPrinter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> ProgressPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> AttemptObserver for ProgressPrinter<W> {
    fn on_attempt(&self, event: &AttemptEvent<'_>) {
        let line = progress_line(event.attempt, event.budget);
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
    }
}

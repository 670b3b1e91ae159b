//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_gate_attempts_total` (counter): probe attempts by outcome
//! - `health_gate_attempt_duration_seconds` (histogram): attempt latency
//! - `health_gate_runs_total` (counter): finished runs by final outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; it is a no-op until a
//!   recorder is installed
//! - A gate run is short-lived, so instead of a scrape endpoint the
//!   Prometheus rendering is written to a textfile when the run ends

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::health::attempt::AttemptOutcome;
use crate::health::gate::FinalOutcome;

pub fn record_attempt(outcome: AttemptOutcome, latency: Duration) {
    metrics::counter!("health_gate_attempts_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("health_gate_attempt_duration_seconds").record(latency.as_secs_f64());
}

pub fn record_run(outcome: FinalOutcome) {
    metrics::counter!("health_gate_runs_total", "outcome" => outcome.as_str()).increment(1);
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}

/// Write the current rendering to `path`, replacing it atomically.
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    fs::write(&tmp, handle.render())?;
    fs::rename(&tmp, path)
}

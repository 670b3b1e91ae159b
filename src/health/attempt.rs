//! Probe attempt records.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// What the transport saw for one completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeObservation {
    /// HTTP status code of the response.
    pub status: u16,
}

/// Classification of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The response met the success predicate.
    Success,
    /// Predicate not met, or a recoverable transport failure (timeout, refused).
    TransientFailure,
    /// A condition retries cannot fix.
    Error,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::TransientFailure => "transient_failure",
            AttemptOutcome::Error => "error",
        }
    }
}

/// One recorded attempt within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeAttempt {
    /// 1-based, strictly increasing within a run.
    pub sequence_number: u32,
    pub target: String,
    pub outcome: AttemptOutcome,
    /// Status code, when a response was received.
    pub status: Option<u16>,
    /// Transport failure description, when no usable response was received.
    pub detail: Option<String>,
    pub observed_at: DateTime<Utc>,
    #[serde(rename = "latency_ms", serialize_with = "serialize_millis")]
    pub latency: Duration,
}

impl ProbeAttempt {
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

pub(crate) fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_serializes_latency_in_millis() {
        let attempt = ProbeAttempt {
            sequence_number: 3,
            target: "http://127.0.0.1:3000/health".into(),
            outcome: AttemptOutcome::TransientFailure,
            status: Some(503),
            detail: None,
            observed_at: Utc::now(),
            latency: Duration::from_millis(1_250),
        };

        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["sequence_number"], 3);
        assert_eq!(json["outcome"], "transient_failure");
        assert_eq!(json["status"], 503);
        assert_eq!(json["latency_ms"], 1_250);
        assert!(json["detail"].is_null());
    }
}

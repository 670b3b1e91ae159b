//! Append-only attempt log.
//!
//! One JSON object per line, one line per attempt, flushed as written so the
//! file is useful while a long gate is still running.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::health::attempt::AttemptOutcome;
use crate::health::gate::{AttemptEvent, AttemptObserver};

#[derive(Debug, Serialize)]
struct AttemptRecord<'a> {
    run_id: Uuid,
    attempt: u32,
    target: &'a str,
    observed_at: DateTime<Utc>,
    outcome: AttemptOutcome,
    status: Option<u16>,
    latency_ms: u64,
    detail: Option<&'a str>,
}

/// Attempt log file. Cheap to share between observers via `Arc`.
#[derive(Debug)]
pub struct AttemptLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AttemptLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &AttemptEvent<'_>) -> io::Result<()> {
        let attempt = event.attempt;
        let record = AttemptRecord {
            run_id: event.run_id,
            attempt: attempt.sequence_number,
            target: &attempt.target,
            observed_at: attempt.observed_at,
            outcome: attempt.outcome,
            status: attempt.status,
            latency_ms: attempt.latency.as_millis() as u64,
            detail: attempt.detail.as_deref(),
        };

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "attempt log lock poisoned"))?;
        file.write_all(&line)?;
        file.flush()
    }
}

impl AttemptObserver for AttemptLog {
    fn on_attempt(&self, event: &AttemptEvent<'_>) {
        if let Err(e) = self.append(event) {
            tracing::warn!(path = ?self.path, error = %e, "Failed to write attempt log");
        }
    }
}

//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap each probe attempt with its per-attempt deadline
//! - Turn an elapsed deadline into a transient `ProbeError::Timeout`
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the in-flight future is dropped on expiry
//! - Timeout errors are distinct from transport errors

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::health::probe::ProbeError;

/// Run `attempt`, failing with `ProbeError::Timeout` once `limit` elapses.
pub async fn bounded<F, T>(limit: Duration, attempt: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>>,
{
    match time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(limit)),
    }
}

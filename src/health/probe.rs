//! Probe transport.
//!
//! # Responsibilities
//! - Perform one readiness request against a target
//! - Report the observed status, or classify the transport failure
//!
//! # Design Decisions
//! - The gate only depends on the `Transport` trait; HTTP is one implementation
//! - The transport does not enforce deadlines; the gate wraps every call
//! - Connection pooling is disabled so each attempt opens a fresh connection

use std::future::Future;

use axum::body::Body;
use hyper::{Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::health::attempt::ProbeObservation;
use crate::health::target::Target;

const USER_AGENT: &str = concat!("health-gate/", env!("CARGO_PKG_VERSION"));

/// Transport-level probe failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The attempt exceeded its per-attempt timeout.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Connection could not be established (refused, unreachable, DNS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connection was made but the exchange failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The request could not even be constructed. Retrying cannot help.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProbeError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProbeError::InvalidRequest(_))
    }
}

/// Capability to perform one readiness request.
pub trait Transport: Send + Sync {
    fn probe(
        &self,
        target: &Target,
    ) -> impl Future<Output = Result<ProbeObservation, ProbeError>> + Send;
}

/// Plain HTTP/1.1 GET transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Body>,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn probe(&self, target: &Target) -> Result<ProbeObservation, ProbeError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(target.uri().clone())
            .header("user-agent", USER_AGENT)
            .body(Body::empty())
            .map_err(|e| ProbeError::InvalidRequest(e.to_string()))?;

        match self.client.request(request).await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::debug!(target = %target, status, "Probe response received");
                Ok(ProbeObservation { status })
            }
            Err(e) if e.is_connect() => {
                tracing::debug!(target = %target, error = %e, "Probe connection failed");
                Err(ProbeError::Connect(root_cause(&e)))
            }
            Err(e) => {
                tracing::debug!(target = %target, error = %e, "Probe request failed");
                Err(ProbeError::Request(root_cause(&e)))
            }
        }
    }
}

/// Innermost error message; hyper-util wraps the useful part.
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

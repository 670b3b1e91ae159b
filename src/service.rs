//! Demo web service used as a gate target.
//!
//! # Responsibilities
//! - Serve `GET /` (greeting) and `GET /health` (readiness JSON)
//! - Simulate the startup behaviours a gate has to cope with
//!
//! # Modes
//! - `healthy`: `/health` is always 200
//! - `slow-start`: `/health` is 503 until `ready_after` has elapsed
//! - `unhealthy`: `/health` is always 503

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::lifecycle::CancelSignal;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How `/health` behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Healthy,
    SlowStart { ready_after: Duration },
    Unhealthy,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Debug)]
struct ServiceState {
    mode: ServiceMode,
    started: Instant,
}

impl ServiceState {
    fn is_ready(&self) -> bool {
        match self.mode {
            ServiceMode::Healthy => true,
            ServiceMode::SlowStart { ready_after } => self.started.elapsed() >= ready_after,
            ServiceMode::Unhealthy => false,
        }
    }
}

/// Build the router. The startup clock starts now.
pub fn router(mode: ServiceMode) -> Router {
    let state = Arc::new(ServiceState {
        mode,
        started: Instant::now(),
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello from the health-gate demo service"
}

async fn health(State(state): State<Arc<ServiceState>>) -> impl IntoResponse {
    let uptime_secs = state.started.elapsed().as_secs();

    if state.is_ready() {
        let body = HealthBody {
            status: "ok".into(),
            uptime_secs,
        };
        (StatusCode::OK, Json(body))
    } else {
        let status = match state.mode {
            ServiceMode::SlowStart { .. } => "starting",
            _ => "unhealthy",
        };
        tracing::debug!(status, uptime_secs, "Reporting not ready");
        let body = HealthBody {
            status: status.into(),
            uptime_secs,
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body))
    }
}

/// Serve on `listener` until `shutdown` is raised.
pub async fn serve(
    listener: TcpListener,
    mode: ServiceMode,
    shutdown: CancelSignal,
) -> std::io::Result<()> {
    tracing::info!(address = ?listener.local_addr()?, mode = ?mode, "Demo service listening");

    axum::serve(listener, router(mode))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_root_route() {
        assert_eq!(get_status(router(ServiceMode::Healthy), "/").await, StatusCode::OK);
        assert_eq!(get_status(router(ServiceMode::Unhealthy), "/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_by_mode() {
        assert_eq!(
            get_status(router(ServiceMode::Healthy), "/health").await,
            StatusCode::OK
        );
        assert_eq!(
            get_status(router(ServiceMode::Unhealthy), "/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_slow_start_becomes_ready() {
        let app = router(ServiceMode::SlowStart {
            ready_after: Duration::from_millis(200),
        });

        assert_eq!(
            get_status(app.clone(), "/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(get_status(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        assert_eq!(
            get_status(router(ServiceMode::Healthy), "/missing").await,
            StatusCode::NOT_FOUND
        );
    }
}

//! Health endpoints: the store-aware `/health` report plus liveness and
//! readiness checks for orchestration and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::state::HttpState;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether startup finished and traffic may be routed here.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether the process is still serving; false once shutdown begins.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn check_response(ok: bool) -> HttpResponse {
        let mut response = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every dependency answered.
    Ok,
    /// The service runs but the document store did not answer.
    Degraded,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// Whether the document store answered a ping.
    pub mongo: bool,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

/// Ping the store, logging failures without surfacing their detail.
pub(crate) async fn store_reachable(state: &HttpState) -> bool {
    match state.store.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "document store ping failed");
            false
        }
    }
}

/// Service health including document store reachability.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthReport),
        (status = 503, description = "Store unreachable", body = HealthReport)
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<HttpState>) -> HttpResponse {
    let mongo = store_reachable(&state).await;
    let report = HealthReport {
        status: if mongo {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        },
        mongo,
        timestamp: Utc::now(),
    };
    let mut response = if mongo {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

/// Readiness check. Return 200 once startup has finished and the store
/// answers; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(
    health_state: web::Data<HealthState>,
    state: web::Data<HttpState>,
) -> HttpResponse {
    let ok = health_state.is_ready() && store_reachable(&state).await;
    HealthState::check_response(ok)
}

/// Liveness check. Return 200 while the process is marked alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(health_state: web::Data<HealthState>) -> HttpResponse {
    HealthState::check_response(health_state.is_alive())
}

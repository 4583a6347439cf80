//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::DomainError;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl HealthCheck {
    fn from_result(name: &str, result: Result<(), DomainError>, start: Instant) -> Self {
        let latency_ms = Some(start.elapsed().as_millis() as u64);

        match result {
            Ok(()) => Self {
                name: name.to_string(),
                status: HealthStatus::Healthy,
                message: None,
                latency_ms,
            },
            Err(e) => Self {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                latency_ms,
            },
        }
    }
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check with dependency verification
///
/// The store is required; the cache only degrades the service since reads
/// fall back to the store.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let store_start = Instant::now();
    let store_check = HealthCheck::from_result("store", state.store().ping().await, store_start);

    let cache_start = Instant::now();
    let cache_check = HealthCheck::from_result("cache", state.cache().ping().await, cache_start);

    let overall_status = overall(store_check.status, cache_check.status);

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![store_check, cache_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

fn overall(store: HealthStatus, cache: HealthStatus) -> HealthStatus {
    if store != HealthStatus::Healthy {
        HealthStatus::Unhealthy
    } else if cache != HealthStatus::Healthy {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

//! Health endpoints
//!
//! `/health` and `/health/live` answer as long as the process serves
//! requests. `/health/ready` also round-trips to account storage and
//! answers 503 when it cannot.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Healthy,
    Alive,
    Ready,
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: ProbeStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<DependencyChecks>,
}

#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub account_storage: DependencyCheck,
}

#[derive(Debug, Serialize)]
pub struct DependencyCheck {
    pub status: DependencyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

fn probe(status: ProbeStatus) -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
    })
}

pub async fn health_check() -> Json<ProbeResponse> {
    probe(ProbeStatus::Healthy)
}

pub async fn liveness_check() -> Json<ProbeResponse> {
    probe(ProbeStatus::Alive)
}

/// Readiness probe: 503 while account storage is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ProbeResponse>) {
    let account_storage = match state.accounts().repository().ping().await {
        Ok(()) => DependencyCheck {
            status: DependencyStatus::Healthy,
            message: None,
        },
        Err(err) => {
            warn!(error = %err, "Account storage unreachable");
            DependencyCheck {
                status: DependencyStatus::Unhealthy,
                message: Some("account storage unavailable"),
            }
        }
    };

    let (code, status) = match account_storage.status {
        DependencyStatus::Healthy => (StatusCode::OK, ProbeStatus::Ready),
        DependencyStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, ProbeStatus::NotReady),
    };

    let mut body = probe(status);
    body.checks = Some(DependencyChecks { account_storage });
    (code, body)
}

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::inbound::http::router::AppState;

/// Deadline for the readiness probe's store round-trip.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
}

/// Liveness probe: the process is up and serving.
pub async fn healthz() -> Json<ProbeResponse> {
    Json(ProbeResponse { status: "ok" })
}

/// Readiness probe: the credential store answers within the deadline.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ProbeResponse>) {
    match tokio::time::timeout(READINESS_TIMEOUT, state.user_service.check_ready()).await {
        Ok(Ok(())) => (StatusCode::OK, Json(ProbeResponse { status: "ready" })),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed");
            not_ready()
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = READINESS_TIMEOUT.as_millis() as u64,
                "Readiness check timed out"
            );
            not_ready()
        }
    }
}

fn not_ready() -> (StatusCode, Json<ProbeResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ProbeResponse {
            status: "not-ready",
        }),
    )
}

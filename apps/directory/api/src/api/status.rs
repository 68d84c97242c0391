//! `/status` with real PostgreSQL and NATS checks.

use async_nats::connection::State as ConnectionState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use axum_helpers::{HealthCheckFuture, StatusReport, run_health_checks};
use database::postgres::check_health_within;
use std::time::Duration;

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Dependency health report
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "All dependencies reachable", body = StatusReport),
        (status = 503, description = "At least one dependency unreachable", body = StatusReport)
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> (StatusCode, Json<StatusReport>) {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "postgres",
            Box::pin(async {
                check_health_within(&state.db, CHECK_TIMEOUT)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "nats",
            Box::pin(async {
                match state.nats.connection_state() {
                    ConnectionState::Connected => Ok(()),
                    other => Err(format!("NATS connection state is {:?}", other)),
                }
            }),
        ),
    ];

    run_health_checks(checks, state.app).await
}

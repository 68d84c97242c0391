use axum::{Json, http::StatusCode};
use core_config::AppInfo;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Connected,
    Disconnected,
}

/// Aggregated dependency status.
///
/// ```json
/// {
///   "status": "ok",
///   "name": "directory_api",
///   "version": "0.1.0",
///   "checks": { "nats": "connected", "postgres": "connected" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusReport {
    /// "ok" or "unavailable"
    pub status: String,
    pub name: String,
    pub version: String,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl StatusReport {
    pub fn is_ok(&self) -> bool {
        self.checks.values().all(|c| *c == CheckStatus::Connected)
    }
}

/// Runs the named checks concurrently.
///
/// Returns 200 when every check passes and 503 otherwise; the body lists each
/// check either way.
///
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![
///     ("postgres", Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) })),
/// ];
/// run_health_checks(checks, app_info!()).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
    app: AppInfo,
) -> (StatusCode, Json<StatusReport>) {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut statuses = BTreeMap::new();
    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => CheckStatus::Connected,
            Err(e) => {
                tracing::error!(check = name, "Health check failed: {}", e);
                CheckStatus::Disconnected
            }
        };
        statuses.insert(name.to_string(), status);
    }

    let mut report = StatusReport {
        status: String::new(),
        name: app.name.to_string(),
        version: app.version.to_string(),
        checks: statuses,
    };

    let code = if report.is_ok() {
        report.status = "ok".to_string();
        StatusCode::OK
    } else {
        report.status = "unavailable".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(report))
}

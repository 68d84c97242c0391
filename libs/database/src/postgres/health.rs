use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::Duration;
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` against the pool.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PostgreSQL: {}", e)))?;

    Ok(())
}

/// [`check_health`] bounded by `timeout`, for status endpoints that must answer promptly.
pub async fn check_health_within(
    db: &DatabaseConnection,
    timeout: Duration,
) -> Result<(), DatabaseError> {
    tokio::time::timeout(timeout, check_health(db))
        .await
        .map_err(|_| DatabaseError::HealthCheckTimeout(timeout))?
}

use std::time::Duration;

/// Database error type shared by connectors and health checks
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Health check query failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Health check did not answer in time
    #[error("Health check timed out after {0:?}")]
    HealthCheckTimeout(Duration),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

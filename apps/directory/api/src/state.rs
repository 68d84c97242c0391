//! Shared application state.
//!
//! Holds the two external connections the service depends on, plus the
//! build metadata reported by `/status`. Cloning is cheap: both clients are
//! handles over shared pools.

use core_config::AppInfo;
use database::postgres::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub app: AppInfo,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    /// NATS client used for mutation notifications
    pub nats: async_nats::Client,
}

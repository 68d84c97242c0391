//! Server infrastructure: router assembly, dependency status, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes);
//! create_production_app(router, &config.server, cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, trim_trailing_slash};
pub use health::{CheckStatus, HealthCheckFuture, StatusReport, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};

//! # Axum Helpers
//!
//! Shared plumbing for Axum services.
//!
//! - **[`errors`]**: `AppError` and the `{status, error}` error body
//! - **[`responses`]**: the `{data}` success envelope
//! - **[`extractors`]**: UUID path and validated JSON extractors
//! - **[`http`]**: request id and access-log middleware
//! - **[`server`]**: router assembly, status checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!     create_production_app(router, &ServerConfig::default(), async {}).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod responses;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse, Operation, validation_message};
pub use extractors::{UuidPath, ValidatedJson};
pub use responses::{ApiResponse, MessageResponse};
pub use server::{
    CheckStatus, HealthCheckFuture, ShutdownCoordinator, StatusReport, create_production_app,
    create_router, run_health_checks, shutdown_signal,
};

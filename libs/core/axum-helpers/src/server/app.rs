use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{log_requests, propagate_request_id_layer, set_request_id_layer};
use axum::{Router, ServiceExt, extract::Request, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::net::SocketAddr;
use tower::{Layer, ServiceBuilder};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wraps the API routes with documentation and cross-cutting middleware.
///
/// - Swagger UI at `/swagger-ui`, document at `/api-docs/openapi.json`
/// - `x-request-id` generated when absent and echoed on the response
/// - one access-log line per request
/// - JSON "resource not found" for unmatched paths
///
/// Routes are mounted at the root; state must already be applied.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let router = create_router::<ApiDoc>(users::router(service));
/// ```
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(middleware::from_fn(log_requests))
                .layer(propagate_request_id_layer()),
        )
}

/// Strips trailing slashes before routing, so `/users/` reaches `/users`.
///
/// Must wrap the whole router: a layer added with `Router::layer` runs after
/// the route has already been matched.
pub fn trim_trailing_slash(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Serves `router` until SIGINT or SIGTERM, then runs `cleanup`.
///
/// In-flight requests are drained first. `cleanup` is bounded by
/// `server_config.shutdown_timeout`; on expiry it is abandoned with a warning.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
///     nats.drain().await.ok();
/// };
///
/// create_production_app(router, &config.server, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();
    let cleanup_handle = coordinator.clone();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_task = tokio::spawn(async move {
        let mut rx = cleanup_handle.subscribe();
        if !cleanup_handle.is_shutting_down() {
            let _ = rx.recv().await;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let app = trim_trailing_slash(router);
    let serve_result = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(async move { signal_handle.wait_for_signal().await })
    .await
    .inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    });

    // Serve can also end on an I/O error; make sure cleanup still runs.
    coordinator.shutdown();
    cleanup_task.await.ok();

    serve_result
}

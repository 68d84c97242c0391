//! Per-request access log.
//!
//! One `info` event per completed request with the response status, remote
//! address, protocol, method and request id. The message is the full request
//! URL, e.g. `http://localhost:8080/users?page=2`.

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderName, header},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer,
};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assigns a UUID `x-request-id` to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(REQUEST_ID_HEADER)
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let version = request.version();
    let uri = request.uri().clone();

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default();

    let remote_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(request).await;

    let scheme = uri.scheme_str().unwrap_or("http");
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    tracing::info!(
        status_code = response.status().as_u16(),
        remote_ip = remote_ip.as_deref(),
        proto = ?version,
        method = %method,
        request_id = request_id.as_deref(),
        "{}://{}{}",
        scheme,
        host,
        path
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::{ServiceBuilder, ServiceExt};

    fn app() -> Router {
        Router::new().route("/ping", get(|| async { "pong" })).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(middleware::from_fn(log_requests))
                .layer(propagate_request_id_layer()),
        )
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let response = app()
            .oneshot(axum::http::Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers().get(&REQUEST_ID_HEADER).unwrap();
        assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_is_kept() {
        let response = app()
            .oneshot(
                axum::http::Request::get("/ping")
                    .header(&REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(&REQUEST_ID_HEADER).unwrap(), "abc-123");
    }
}

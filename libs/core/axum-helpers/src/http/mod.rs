//! HTTP middleware.
//!
//! ```ignore
//! use axum_helpers::http::{log_requests, set_request_id_layer, propagate_request_id_layer};
//!
//! let app = Router::new()
//!     .layer(propagate_request_id_layer())
//!     .layer(axum::middleware::from_fn(log_requests))
//!     .layer(set_request_id_layer());
//! ```

pub mod request_log;

pub use request_log::{
    REQUEST_ID_HEADER, log_requests, propagate_request_id_layer, set_request_id_layer,
};

use axum::Router;
use domain_users::{NatsNotifier, PgUserRepository, UserService, handlers};
use std::time::Duration;

pub mod status;

use crate::state::AppState;

/// Creates the API routes.
///
/// Returns a stateless Router; the users sub-router already carries its
/// service and `/status` carries the app state.
pub fn routes(state: &AppState, publish_timeout: Duration) -> Router {
    let service = UserService::new(
        PgUserRepository::new(state.db.clone()),
        NatsNotifier::new(state.nats.clone(), publish_timeout),
    );

    Router::new()
        .nest("/users", handlers::router(service))
        .merge(status::router(state.clone()))
}

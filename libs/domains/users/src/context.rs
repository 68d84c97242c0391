//! Identity resolution for `/{user_id}` routes.
//!
//! [`resolve_user`] parses the path id, loads the user once and stores it as a
//! [`ResolvedUser`] request extension. Malformed ids are rejected with
//! "invalid request", unknown ids with "resource not found"; the downstream
//! handler runs only when the lookup hit.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_helpers::{AppError, UuidPath};
use std::sync::Arc;

use crate::models::User;
use crate::notifier::Notifier;
use crate::repository::UserRepository;
use crate::service::UserService;

/// The user named by the request path, loaded by [`resolve_user`].
#[derive(Debug, Clone)]
pub struct ResolvedUser(pub User);

impl<S> FromRequestParts<S> for ResolvedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedUser>()
            .cloned()
            .ok_or_else(|| AppError::Internal("route is missing the user resolver".into()))
    }
}

pub async fn resolve_user<R, N>(
    State(service): State<Arc<UserService<R, N>>>,
    UuidPath(id): UuidPath,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    R: UserRepository + 'static,
    N: Notifier + 'static,
{
    let user = service.get_by_id(id).await?;
    request.extensions_mut().insert(ResolvedUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::notifier::MockNotifier;
    use crate::repository::InMemoryUserRepository;
    use axum::{
        Router, body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn nickname(ResolvedUser(user): ResolvedUser) -> String {
        user.nickname
    }

    async fn app() -> (Router, Uuid) {
        let repo = InMemoryUserRepository::new();
        let id = Uuid::new_v4();
        repo.insert(NewUser {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: "ada".into(),
            password_hash: "hash".into(),
            email: "ada@example.com".into(),
            country: "GB".into(),
        })
        .await
        .unwrap();

        let service = Arc::new(UserService::new(repo, MockNotifier::new()));
        let router = Router::new()
            .route("/{user_id}", get(nickname))
            .route_layer(from_fn_with_state(
                service.clone(),
                resolve_user::<InMemoryUserRepository, MockNotifier>,
            ))
            .with_state(service);
        (router, id)
    }

    async fn status_of(router: Router, uri: String) -> StatusCode {
        router
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_known_id_resolves() {
        let (router, id) = app().await;
        assert_eq!(status_of(router, format!("/{id}")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (router, _) = app().await;
        let uri = format!("/{}", Uuid::new_v4());
        assert_eq!(status_of(router, uri).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let (router, _) = app().await;
        assert_eq!(
            status_of(router, "/not-a-uuid".into()).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_extractor_without_resolver_is_internal() {
        let router = Router::new().route("/{user_id}", get(nickname));
        let uri = format!("/{}", Uuid::new_v4());
        assert_eq!(
            status_of(router, uri).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

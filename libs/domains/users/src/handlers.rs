use axum::{
    Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
};
use axum_helpers::{ApiResponse, AppError, ErrorResponse, MessageResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::context::{ResolvedUser, resolve_user};
use crate::models::{Created, InputUser, ListQuery, User, UserPage};
use crate::notifier::Notifier;
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(schemas(
        User,
        InputUser,
        UserPage,
        Created,
        MessageResponse,
        ErrorResponse
    )),
    tags((name = "users", description = "User directory"))
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints.
///
/// `/{user_id}` routes run behind [`resolve_user`], so their handlers receive
/// the loaded record instead of a raw id.
pub fn router<R, N>(service: UserService<R, N>) -> Router
where
    R: UserRepository + 'static,
    N: Notifier + 'static,
{
    let shared_service = Arc::new(service);

    let by_id = Router::new()
        .route(
            "/{user_id}",
            get(get_user)
                .put(update_user::<R, N>)
                .delete(delete_user::<R, N>),
        )
        .route_layer(from_fn_with_state(
            shared_service.clone(),
            resolve_user::<R, N>,
        ));

    Router::new()
        .route("/", get(list_users::<R, N>).post(create_user::<R, N>))
        .merge(by_id)
        .with_state(shared_service)
}

/// List users
///
/// `page` and `page_size` that are missing, non-numeric or below 1 fall
/// back to 1 and 10.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<UserPage>),
        (status = 400, description = "Select failed", body = ErrorResponse)
    )
)]
async fn list_users<R: UserRepository, N: Notifier>(
    State(service): State<Arc<UserService<R, N>>>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<UserPage>, AppError> {
    let page = service.get(query.filter(), query.page()).await?;
    Ok(ApiResponse::new(page))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = InputUser,
    responses(
        (status = 200, description = "User created", body = ApiResponse<Created>),
        (status = 400, description = "Invalid body, validation errors or create failed", body = ErrorResponse)
    )
)]
async fn create_user<R: UserRepository, N: Notifier>(
    State(service): State<Arc<UserService<R, N>>>,
    ValidatedJson(input): ValidatedJson<InputUser>,
) -> Result<ApiResponse<Created>, AppError> {
    let id = service.store(input).await?;
    Ok(ApiResponse::new(Created {
        message: "successfully created".to_string(),
        created: id,
    }))
}

/// Fetch a user
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = TAG,
    params(("user_id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<User>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
async fn get_user(ResolvedUser(user): ResolvedUser) -> ApiResponse<User> {
    ApiResponse::new(user)
}

/// Replace every editable field of a user
#[utoipa::path(
    put,
    path = "/{user_id}",
    tag = TAG,
    params(("user_id" = uuid::Uuid, Path, description = "User ID")),
    request_body = InputUser,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Malformed id, validation errors or update failed", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
async fn update_user<R: UserRepository, N: Notifier>(
    State(service): State<Arc<UserService<R, N>>>,
    ResolvedUser(user): ResolvedUser,
    ValidatedJson(input): ValidatedJson<InputUser>,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    service.update(user.id, input).await?;
    Ok(ApiResponse::new(MessageResponse::new("successfully updated")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = TAG,
    params(("user_id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Malformed id or delete failed", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
async fn delete_user<R: UserRepository, N: Notifier>(
    State(service): State<Arc<UserService<R, N>>>,
    ResolvedUser(user): ResolvedUser,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    service.delete(user.id).await?;
    Ok(ApiResponse::new(MessageResponse::new("successfully deleted")))
}

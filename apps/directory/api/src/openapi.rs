use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::status::status_handler),
    components(schemas(axum_helpers::ErrorResponse, axum_helpers::StatusReport)),
    info(
        title = "Directory API",
        version = "0.1.0",
        description = "User directory: create, search, fetch, update and delete users"
    ),
    nest(
        (path = "/users", api = domain_users::ApiDoc)
    ),
    tags((name = "status", description = "Dependency health"))
)]
pub struct ApiDoc;

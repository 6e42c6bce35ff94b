//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::auth_handler::CredentialsRequest;
use crate::handlers::health_handler::HealthResponse;
use domain::AccountResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::signup,
        crate::handlers::auth_handler::login,
        crate::handlers::health_handler::health_check,
    ),
    components(schemas(CredentialsRequest, AccountResponse, HealthResponse)),
    tags(
        (name = "Authentication", description = "Signup and login endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

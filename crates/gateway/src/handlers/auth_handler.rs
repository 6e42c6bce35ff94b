//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{AccountResponse, SignupRequest};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Signup and login request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// Account username
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "p1")]
    pub password: String,
}

impl From<CredentialsRequest> for SignupRequest {
    fn from(body: CredentialsRequest) -> Self {
        SignupRequest::new(body.username, body.password)
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let request = SignupRequest::from(payload);
    let account = state.auth_service.signup(&request).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Verify credentials
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unknown username or incorrect password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<AccountResponse>> {
    let request = SignupRequest::from(payload);
    let account = state.auth_service.login(&request).await?;

    Ok(Json(AccountResponse::from(account)))
}

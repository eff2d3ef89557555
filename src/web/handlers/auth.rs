//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{parse_role, AppState};
use crate::auth::RegistrationRequest;
use crate::db::UserRepository;
use crate::web::dto::{
    ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UserResponse, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::middleware::AuthUser;

/// POST /api/auth/register - Create an account and sign in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 403, description = "Role cannot be self-assigned", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let mut request = RegistrationRequest::new(req.name, req.email, req.password);
    if let Some(ref role) = req.role {
        request = request.with_role(parse_role(role)?);
    }

    let issued = state.issuer().register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(AuthResponse::from(issued))),
    ))
}

/// POST /api/auth/login - Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 429, description = "Too many attempts", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let issued = state.issuer().login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::new(AuthResponse::from(issued))))
}

/// GET /api/auth/me - Current user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

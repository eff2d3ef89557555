//! User handlers for Web API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::{parse_role, AppState};
use crate::auth::{authorize, authorize_self_or, hash_password};
use crate::db::{Role, UserRepository, UserUpdate};
use crate::web::dto::{
    ApiResponse, UpdateProfileRequest, UpdateRoleRequest, UserResponse, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::middleware::AuthUser;
use crate::CampusError;

/// Query parameters for the user list.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Only list users with this role.
    pub role: Option<String>,
}

/// GET /api/users - List users. Admin only.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    authorize(&principal, Role::Admin)?;

    let repo = UserRepository::new(state.db.pool());
    let users = match query.role {
        Some(ref role) => repo.list_by_role(parse_role(role)?).await?,
        None => repo.list_all().await?,
    };

    Ok(Json(ApiResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// GET /api/users/{id} - Get a user. Self or admin.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Not yourself and not an admin", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    authorize_self_or(&principal, user_id, Role::Admin)?;

    let user = UserRepository::new(state.db.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PUT /api/users/me - Update your own name, email or password.
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let mut update = UserUpdate::new();
    if let Some(name) = req.name {
        update = update.name(name.trim());
    }
    if let Some(email) = req.email {
        update = update.email(email.trim());
    }
    if let Some(password) = req.password {
        let hash = hash_password(&password, &state.hash_params).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to update password")
        })?;
        update = update.password(hash);
    }

    let user = UserRepository::new(state.db.pool())
        .update(principal.id, &update)
        .await
        .map_err(|e| match e {
            CampusError::Conflict(_) => ApiError::conflict("Email already registered"),
            other => ApiError::from(other),
        })?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PUT /api/users/{id}/role - Change a user's role. Admin only.
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Cannot change your own role", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 422, description = "Unknown role", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    authorize(&principal, Role::Admin)?;
    if principal.is(user_id) {
        return Err(ApiError::bad_request("Cannot change your own role"));
    }
    let role = parse_role(&req.role)?;

    let user = UserRepository::new(state.db.pool())
        .update(user_id, &UserUpdate::new().role(role))
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    tracing::info!(user_id, role = %role, by = principal.id, "Role changed");
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// DELETE /api/users/{id} - Delete a user. Admin only.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Cannot delete yourself", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    authorize(&principal, Role::Admin)?;
    if principal.is(user_id) {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    if !UserRepository::new(state.db.pool()).delete(user_id).await? {
        return Err(ApiError::not_found("user not found"));
    }

    tracing::info!(user_id, by = principal.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

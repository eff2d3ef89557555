//! Enrollment handlers for Web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::course::CourseService;
use crate::web::dto::{
    ApiResponse, EnrolledCourseResponse, EnrollmentResponse, RosterEntryResponse,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::middleware::AuthUser;

/// POST /api/courses/{id}/enrollment - Enroll yourself in a course.
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enrollment",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentResponse),
        (status = 404, description = "No such course", body = ErrorBody),
        (status = 409, description = "Already enrolled", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentResponse>>), ApiError> {
    let enrollment = CourseService::new(&state.db)
        .enroll(&principal, course_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(EnrollmentResponse::from(enrollment))),
    ))
}

/// DELETE /api/courses/{id}/enrollment - Withdraw from a course.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}/enrollment",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Withdrawn"),
        (status = 404, description = "Not enrolled", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unenroll(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    CourseService::new(&state.db)
        .unenroll(&principal, course_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/courses/{id}/enrollments - Course roster.
#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollments",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled users", body = Vec<RosterEntryResponse>),
        (status = 403, description = "Not staff for this course", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn course_roster(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<RosterEntryResponse>>>, ApiError> {
    let roster = CourseService::new(&state.db)
        .roster(&principal, course_id)
        .await?;
    Ok(Json(ApiResponse::new(
        roster.into_iter().map(RosterEntryResponse::from).collect(),
    )))
}

/// GET /api/enrollments/me - Your enrollments.
#[utoipa::path(
    get,
    path = "/api/enrollments/me",
    tag = "enrollments",
    responses(
        (status = 200, description = "Courses you are enrolled in", body = Vec<EnrolledCourseResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_enrollments(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ApiResponse<Vec<EnrolledCourseResponse>>>, ApiError> {
    let courses = CourseService::new(&state.db)
        .my_enrollments(&principal)
        .await?;
    Ok(Json(ApiResponse::new(
        courses.into_iter().map(EnrolledCourseResponse::from).collect(),
    )))
}

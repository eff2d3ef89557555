//! Course handlers for Web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::course::{CourseService, CourseUpdate, NewCourse};
use crate::web::dto::validation::sanitize_string;
use crate::web::dto::{
    ApiResponse, CourseResponse, CreateCourseRequest, UpdateCourseRequest, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::middleware::AuthUser;

/// GET /api/courses - List courses.
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    responses(
        (status = 200, description = "All courses", body = Vec<CourseResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    AuthUser(_principal): AuthUser,
) -> Result<Json<ApiResponse<Vec<CourseResponse>>>, ApiError> {
    let courses = CourseService::new(&state.db).list_courses().await?;
    Ok(Json(ApiResponse::new(
        courses.into_iter().map(CourseResponse::from).collect(),
    )))
}

/// GET /api/courses/{id} - Get a course.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    AuthUser(_principal): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<CourseResponse>>, ApiError> {
    let course = CourseService::new(&state.db).get_course(course_id).await?;
    Ok(Json(ApiResponse::new(CourseResponse::from(course))))
}

/// POST /api/courses - Create a course. Admin only.
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CourseResponse>>), ApiError> {
    let course = NewCourse {
        title: req.title,
        description: req.description.map(|d| sanitize_string(&d)),
        instructor_id: req.instructor_id,
    };

    let created = CourseService::new(&state.db)
        .create_course(&principal, course)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CourseResponse::from(created))),
    ))
}

/// PUT /api/courses/{id} - Update a course. Admin or the assigned instructor.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = CourseResponse),
        (status = 403, description = "Not allowed to edit this course", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(course_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCourseRequest>,
) -> Result<Json<ApiResponse<CourseResponse>>, ApiError> {
    let update = CourseUpdate {
        title: req.title,
        description: req
            .description
            .map(|d| d.map(|text| sanitize_string(&text))),
        instructor_id: req.instructor_id,
    };

    let course = CourseService::new(&state.db)
        .update_course(&principal, course_id, update)
        .await?;
    Ok(Json(ApiResponse::new(CourseResponse::from(course))))
}

/// DELETE /api/courses/{id} - Delete a course. Admin only.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    CourseService::new(&state.db)
        .delete_course(&principal, course_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

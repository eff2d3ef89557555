//! OpenAPI document and Swagger UI.
//!
//! Swagger UI is served at `/swagger-ui`, the raw document at
//! `/api-docs/openapi.json`. New endpoints need a `#[utoipa::path]`
//! annotation and an entry in `paths(...)` below.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    AuthResponse, CourseResponse, CreateCourseRequest, EnrolledCourseResponse,
    EnrollmentResponse, LoginRequest, RegisterRequest, RosterEntryResponse, UpdateCourseRequest,
    UpdateProfileRequest, UpdateRoleRequest, UserResponse,
};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};

/// Campus API document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus API",
        description = "Users, courses and enrollments behind bearer-token authentication.",
        license(name = "MIT")
    ),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "users", description = "User administration and self-service profile"),
        (name = "courses", description = "Course catalogue"),
        (name = "enrollments", description = "Enrollment and rosters")
    ),
    components(
        schemas(
            ErrorBody,
            ErrorDetail,
            ErrorCode,
            AuthResponse,
            UserResponse,
            CourseResponse,
            EnrollmentResponse,
            RosterEntryResponse,
            EnrolledCourseResponse,
            LoginRequest,
            RegisterRequest,
            UpdateProfileRequest,
            UpdateRoleRequest,
            CreateCourseRequest,
            UpdateCourseRequest,
        )
    ),
    paths(
        crate::web::handlers::auth::register,
        crate::web::handlers::auth::login,
        crate::web::handlers::auth::me,
        crate::web::handlers::user::list_users,
        crate::web::handlers::user::get_user,
        crate::web::handlers::user::update_me,
        crate::web::handlers::user::update_user_role,
        crate::web::handlers::user::delete_user,
        crate::web::handlers::course::list_courses,
        crate::web::handlers::course::get_course,
        crate::web::handlers::course::create_course,
        crate::web::handlers::course::update_course,
        crate::web::handlers::course::delete_course,
        crate::web::handlers::enrollment::enroll,
        crate::web::handlers::enrollment::unenroll,
        crate::web::handlers::enrollment::course_roster,
        crate::web::handlers::enrollment::my_enrollments,
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI router.
pub fn create_swagger_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

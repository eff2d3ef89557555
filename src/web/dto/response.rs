//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::IssuedCredential;
use crate::course::{Course, EnrolledCourse, Enrollment, RosterEntry};
use crate::db::{Role, User};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Token plus the principal it was issued for.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token (JWT).
    pub token: String,
    /// Authenticated user.
    pub user: UserResponse,
}

impl From<IssuedCredential> for AuthResponse {
    fn from(issued: IssuedCredential) -> Self {
        Self {
            token: issued.token,
            user: issued.user.into(),
        }
    }
}

// ============================================================================
// User DTOs
// ============================================================================

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    #[schema(value_type = String, example = "student")]
    pub role: Role,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Course DTOs
// ============================================================================

/// Course response.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    /// Course ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Assigned instructor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            instructor_id: course.instructor_id,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

// ============================================================================
// Enrollment DTOs
// ============================================================================

/// Enrollment response.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    /// Enrollment ID.
    pub id: i64,
    /// User ID.
    pub user_id: i64,
    /// Course ID.
    pub course_id: i64,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            course_id: e.course_id,
            enrolled_at: e.enrolled_at,
        }
    }
}

/// Roster entry response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntryResponse {
    /// User ID.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

impl From<RosterEntry> for RosterEntryResponse {
    fn from(e: RosterEntry) -> Self {
        Self {
            user_id: e.user_id,
            name: e.name,
            email: e.email,
            enrolled_at: e.enrolled_at,
        }
    }
}

/// One of the current user's enrollments.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCourseResponse {
    /// Course ID.
    pub course_id: i64,
    /// Course title.
    pub title: String,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

impl From<EnrolledCourse> for EnrolledCourseResponse {
    fn from(e: EnrolledCourse) -> Self {
        Self {
            course_id: e.course_id,
            title: e.title,
            enrolled_at: e.enrolled_at,
        }
    }
}

//! Course and enrollment types.

/// A course in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Course {
    /// Course ID.
    pub id: i64,
    /// Course title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assigned instructor, if any.
    pub instructor_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Data for creating a course.
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    /// Course title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional instructor.
    pub instructor_id: Option<i64>,
}

impl NewCourse {
    /// Create a course with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the instructor.
    pub fn with_instructor(mut self, instructor_id: i64) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }
}

/// Partial update of a course.
///
/// The nested options distinguish "leave unchanged" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New instructor.
    pub instructor_id: Option<Option<i64>>,
}

impl CourseUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set or clear the description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set or clear the instructor.
    pub fn instructor(mut self, instructor_id: Option<i64>) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.instructor_id.is_none()
    }
}

/// A user's enrollment in a course.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Enrollment {
    /// Enrollment ID.
    pub id: i64,
    /// Enrolled user.
    pub user_id: i64,
    /// Course.
    pub course_id: i64,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

/// A roster line: an enrolled user as seen by the course staff.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RosterEntry {
    /// User ID.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

/// A course the current user is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EnrolledCourse {
    /// Course ID.
    pub course_id: i64,
    /// Course title.
    pub title: String,
    /// Enrollment timestamp.
    pub enrolled_at: String,
}

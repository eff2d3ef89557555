//! Course module for campus.
//!
//! Courses, enrollments, and the role-checked service over them.

mod enrollment;
mod repository;
mod service;
mod types;

pub use enrollment::EnrollmentRepository;
pub use repository::CourseRepository;
pub use service::{CourseService, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
pub use types::{Course, CourseUpdate, EnrolledCourse, Enrollment, NewCourse, RosterEntry};

//! campus - learning-management backend.
//!
//! Users, courses and enrollments behind bearer-token access control,
//! served as a JSON API, plus a client that keeps the token and reacts
//! to rejected sessions.

pub mod auth;
pub mod client;
pub mod config;
pub mod course;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    authorize, authorize_self_or, ensure_user, AccessGate, CredentialIssuer, HashParams,
    IssuedCredential, Principal, RegistrationRequest, TokenService,
};
pub use client::{
    ApiClient, ClientError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    Navigator, SessionUser,
};
pub use config::Config;
pub use course::{Course, CourseService, Enrollment, NewCourse};
pub use db::{Database, NewUser, Role, User, UserRepository, UserUpdate};
pub use error::{CampusError, Result};
pub use web::WebServer;

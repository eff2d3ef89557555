//! API handlers.

pub mod auth;
pub mod course;
pub mod enrollment;
pub mod user;

pub use auth::*;
pub use course::*;
pub use enrollment::*;
pub use user::*;

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{CredentialIssuer, HashParams, TokenService};
use crate::db::{Database, Role};
use crate::web::error::ApiError;

/// Shared database handle for the Web API.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub db: SharedDatabase,
    /// Token signer/verifier.
    pub tokens: TokenService,
    /// Argon2 cost parameters for new hashes.
    pub hash_params: HashParams,
    /// Roles a caller may pick when registering.
    pub self_registration_roles: Vec<Role>,
}

impl AppState {
    /// Create a new application state with default hashing and
    /// student/instructor self-registration.
    pub fn new(db: SharedDatabase, tokens: TokenService) -> Self {
        Self {
            db,
            tokens,
            hash_params: HashParams::default(),
            self_registration_roles: vec![Role::Student, Role::Instructor],
        }
    }

    /// Set the Argon2 parameters.
    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }

    /// Set the roles open to self-registration.
    pub fn with_self_registration_roles(mut self, roles: Vec<Role>) -> Self {
        self.self_registration_roles = roles;
        self
    }

    /// Credential issuer bound to this state.
    pub fn issuer(&self) -> CredentialIssuer<'_> {
        CredentialIssuer::new(
            &self.db,
            &self.tokens,
            self.hash_params,
            &self.self_registration_roles,
        )
    }
}

/// Parse a role name from a request body, rejecting unknown names with 422.
pub(crate) fn parse_role(value: &str) -> Result<Role, ApiError> {
    value.parse::<Role>().map_err(|e| {
        let mut details = HashMap::new();
        details.insert("role".to_string(), vec![e.to_string()]);
        ApiError::validation(details)
    })
}

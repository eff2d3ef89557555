//! Access gate: bearer token to live principal, and the role gate.
//!
//! A protected request moves through
//! `Unauthenticated -> TokenPresent -> TokenVerified -> PrincipalResolved`
//! in [`AccessGate::authenticate`]; any failure on the way is
//! `NotAuthenticated`. The per-operation [`authorize`] check then ends in
//! `Authorized` or `Forbidden`.

use std::sync::Arc;

use serde::Serialize;

use super::token::TokenService;
use crate::db::{Database, Role, User, UserRepository};
use crate::{CampusError, Result};

/// Authorization scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated identity attached to a request.
///
/// Built from the current database row, never from the token's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// User ID.
    pub id: i64,
    /// Current email.
    pub email: String,
    /// Current role.
    pub role: Role,
    /// Current display name.
    pub name: String,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            name: user.name,
        }
    }
}

impl Principal {
    /// Whether this principal is the given user.
    pub fn is(&self, user_id: i64) -> bool {
        self.id == user_id
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token counts as missing.
pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or_else(|| not_authenticated("Missing authorization"))?;

    let scheme = header
        .get(..BEARER_PREFIX.len())
        .ok_or_else(|| not_authenticated("Malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(not_authenticated("Malformed authorization header"));
    }

    let token = header[BEARER_PREFIX.len()..].trim();
    if token.is_empty() {
        return Err(not_authenticated("Missing authorization"));
    }
    Ok(token)
}

/// Resolves bearer tokens to live principals.
#[derive(Debug, Clone)]
pub struct AccessGate {
    db: Arc<Database>,
    tokens: TokenService,
}

impl AccessGate {
    /// Create a gate over the shared database and token verifier.
    pub fn new(db: Arc<Database>, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Token service used to verify tokens.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate a request from its `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal> {
        let token = extract_bearer(authorization)?;
        let claims = self.tokens.verify(token)?;

        let user = UserRepository::new(self.db.pool())
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = claims.sub, "Token subject no longer exists");
                not_authenticated("Account no longer exists")
            })?;

        if user.role != claims.role {
            tracing::debug!(
                user_id = user.id,
                token_role = %claims.role,
                current_role = %user.role,
                "Role changed since token issuance"
            );
        }

        Ok(Principal::from(user))
    }
}

/// Role gate: require at least `required` for the operation.
pub fn authorize(principal: &Principal, required: Role) -> Result<()> {
    if principal.role.can_access(required) {
        Ok(())
    } else {
        Err(CampusError::Forbidden(format!("{required} role required")))
    }
}

/// Require `required`, or that the principal is `owner_id` itself.
pub fn authorize_self_or(principal: &Principal, owner_id: i64, required: Role) -> Result<()> {
    if principal.is(owner_id) {
        return Ok(());
    }
    authorize(principal, required)
}

fn not_authenticated(message: &str) -> CampusError {
    CampusError::NotAuthenticated(message.to_string())
}

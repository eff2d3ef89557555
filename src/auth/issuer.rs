//! Credential issuer: login and registration.
//!
//! Both operations end by minting a session token for the principal. Login
//! failures never reveal whether the email exists: unknown email and wrong
//! password produce the same error and run the same hash verification.

use tracing::{info, warn};

use super::password::{
    hash_password, hash_unchecked, verify_password, HashParams, PasswordError,
};
use super::token::TokenService;
use super::validation::{validate_registration, ValidationError};
use crate::db::{Database, NewUser, Role, User, UserRepository};
use crate::{CampusError, Result};

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message returned when registering an email that already exists.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

/// A freshly issued token together with the principal it was issued for.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password (8-128 characters).
    pub password: String,
    /// Requested role; `None` means student.
    pub role: Option<Role>,
}

impl RegistrationRequest {
    /// Create a registration request for a student.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    /// Request a specific role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Validates credentials and mints tokens.
pub struct CredentialIssuer<'a> {
    db: &'a Database,
    tokens: &'a TokenService,
    params: HashParams,
    self_registration_roles: &'a [Role],
}

impl<'a> CredentialIssuer<'a> {
    /// Create an issuer over the given database and token service.
    pub fn new(
        db: &'a Database,
        tokens: &'a TokenService,
        params: HashParams,
        self_registration_roles: &'a [Role],
    ) -> Self {
        Self {
            db,
            tokens,
            params,
            self_registration_roles,
        }
    }

    /// Authenticate an email/password pair and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedCredential> {
        let repo = UserRepository::new(self.db.pool());
        let user = repo.get_by_email(email.trim()).await?;

        let user = match user {
            Some(user) => match verify_password(password, &user.password) {
                Ok(()) => Some(user),
                Err(PasswordError::InvalidHash) => {
                    tracing::error!(user_id = user.id, "Stored password hash is malformed");
                    None
                }
                Err(_) => None,
            },
            None => {
                // Spend comparable time on unknown emails.
                if let Err(e) = hash_unchecked(password, &self.params) {
                    tracing::error!("Failed to hash for unknown email: {}", e);
                }
                None
            }
        };

        let user = user.ok_or_else(|| {
            warn!("Rejected login attempt");
            CampusError::NotAuthenticated(INVALID_CREDENTIALS_MESSAGE.to_string())
        })?;

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(IssuedCredential { token, user })
    }

    /// Register a new user and issue a token for them.
    ///
    /// Fails with [`CampusError::Conflict`] if the email is taken (the
    /// existing account is left untouched) and [`CampusError::Forbidden`]
    /// if the requested role is not open to self-registration.
    pub async fn register(&self, request: RegistrationRequest) -> Result<IssuedCredential> {
        let email = request.email.trim();
        let name = request.name.trim();

        validate_registration(name, email, &request.password).map_err(validation_error)?;

        let role = request.role.unwrap_or_default();
        if !self.self_registration_roles.contains(&role) {
            return Err(CampusError::Forbidden(format!(
                "Role '{role}' cannot be self-assigned"
            )));
        }

        let repo = UserRepository::new(self.db.pool());
        if repo.email_exists(email).await? {
            return Err(CampusError::Conflict(EMAIL_TAKEN_MESSAGE.to_string()));
        }

        let password_hash = hash_password(&request.password, &self.params).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            CampusError::Validation(e.to_string())
        })?;

        let new_user = NewUser::new(name, email, password_hash).with_role(role);
        // A concurrent registration can still win the race; the UNIQUE
        // constraint turns that into the same Conflict.
        let user = repo.create(&new_user).await.map_err(|e| match e {
            CampusError::Conflict(_) => CampusError::Conflict(EMAIL_TAKEN_MESSAGE.to_string()),
            other => other,
        })?;

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(IssuedCredential { token, user })
    }
}

fn validation_error(e: ValidationError) -> CampusError {
    CampusError::Validation(e.to_string())
}

/// Create a user with the given role unless the email already exists.
///
/// Used to bootstrap the first administrator. Returns the created user, or
/// `None` if the email was already registered.
pub async fn ensure_user(
    db: &Database,
    params: &HashParams,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Option<User>> {
    let repo = UserRepository::new(db.pool());
    if repo.email_exists(email).await? {
        return Ok(None);
    }

    validate_registration(name, email, password).map_err(validation_error)?;
    let hash = hash_password(password, params).map_err(|e| CampusError::Validation(e.to_string()))?;
    let user = repo
        .create(&NewUser::new(name, email, hash).with_role(role))
        .await?;
    info!(user_id = user.id, role = %role, "Bootstrap user created");
    Ok(Some(user))
}

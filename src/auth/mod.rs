//! Authentication module for campus.
//!
//! Password hashing, token signing, the credential issuer (login and
//! registration) and the access gate that turns bearer tokens into
//! principals and checks roles.

pub mod gate;
pub mod issuer;
mod password;
pub mod token;
pub mod validation;

pub use gate::{authorize, authorize_self_or, extract_bearer, AccessGate, Principal};
pub use issuer::{
    ensure_user, CredentialIssuer, IssuedCredential, RegistrationRequest,
    INVALID_CREDENTIALS_MESSAGE,
};
pub use password::{
    hash_password, validate_password, verify_password, HashParams, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use token::{Claims, TokenService};
pub use validation::ValidationError;

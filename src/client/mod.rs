//! Client side of the campus API.
//!
//! [`ApiClient`] keeps the bearer token in a [`CredentialStore`] and hands
//! control to a [`Navigator`] whenever the server rejects the session.

mod api;
mod error;
mod navigator;
mod store;

pub use api::{ApiClient, USER_AGENT};
pub use error::ClientError;
pub use navigator::{LogNavigator, Navigator, RecordingNavigator, LOGIN_ROUTE};
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionUser, StoredCredential,
};

//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{inject_gate, AuthUser};
pub use cors::create_cors_layer;
pub use rate_limit::{login_rate_limit, RateLimitState};

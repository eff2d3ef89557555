//! Configuration module for campus.

use serde::Deserialize;
use std::path::Path;

use crate::db::Role;
use crate::{CampusError, Result};

/// Minimum accepted length of the JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 16;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins (empty = any origin, no credentials).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for the login endpoint (requests per minute per client IP).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Key the login limit on `X-Forwarded-For` / `X-Real-IP`. Enable only
    /// behind a reverse proxy that sets these headers itself.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_login_rate_limit() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            login_rate_limit: default_login_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/campus.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (HS256). Must be set.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 lanes.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Roles a visitor may request for themselves on registration.
    #[serde(default = "default_self_registration_roles")]
    pub self_registration_roles: Vec<String>,
}

fn default_token_expiry() -> u64 {
    86400 // 24 hours
}

fn default_argon2_memory() -> u32 {
    65536 // 64 MiB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_self_registration_roles() -> Vec<String> {
    vec!["student".to_string(), "instructor".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_secs: default_token_expiry(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            self_registration_roles: default_self_registration_roles(),
        }
    }
}

impl AuthConfig {
    /// Parse the self-registration role list.
    pub fn self_registration_roles(&self) -> Result<Vec<Role>> {
        self.self_registration_roles
            .iter()
            .map(|r| {
                r.parse::<Role>()
                    .map_err(|e| CampusError::Config(format!("auth.self_registration_roles: {e}")))
            })
            .collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/campus.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Bootstrap administrator, created on startup when no account uses the email.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email. Bootstrap is skipped when empty.
    #[serde(default)]
    pub email: String,
    /// Plaintext password, hashed before it is stored.
    #[serde(default)]
    pub password: String,
}

impl AdminConfig {
    /// Whether a bootstrap administrator is configured.
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Bootstrap administrator.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CampusError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CampusError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CAMPUS_JWT_SECRET`: JWT signing secret
    /// - `CAMPUS_ADMIN_PASSWORD`: bootstrap administrator password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("CAMPUS_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(password) = std::env::var("CAMPUS_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.password = password;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is missing or shorter than [`MIN_JWT_SECRET_LENGTH`]
    /// - a self-registration role is not a known role
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(CampusError::Config(
                "auth.jwt_secret is not set. \
                 Set it in config.toml or via CAMPUS_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(CampusError::Config(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
            )));
        }
        self.auth.self_registration_roles()?;
        Ok(())
    }
}

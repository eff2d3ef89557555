//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use campus::auth::{ensure_user, HashParams};
use campus::{Config, Database, Role, User, WebServer};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const PASSWORD: &str = "correct-horse-battery";

/// Configuration with cheap hashing and a generous login limit.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.login_rate_limit = 100;
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.argon2_memory_kib = 8;
    config.auth.argon2_iterations = 1;
    config.auth.argon2_parallelism = 1;
    config
}

/// Test server over an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    create_test_server_with(test_config()).await
}

pub async fn create_test_server_with(config: Config) -> (TestServer, Arc<Database>) {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let web = WebServer::new(&config, db.clone()).expect("Failed to create web server");
    let server = TestServer::new(web.router()).expect("Failed to create test server");
    (server, db)
}

/// Insert an account directly, bypassing self-registration rules.
pub async fn create_user(db: &Database, name: &str, email: &str, role: Role) -> User {
    let params = HashParams::from_config(&test_config().auth);
    ensure_user(db, &params, name, email, PASSWORD, role)
        .await
        .expect("Failed to create user")
        .expect("Email already taken")
}

/// POST /api/auth/register and return the response body.
pub async fn register(server: &TestServer, name: &str, email: &str, role: Option<&str>) -> Value {
    let mut body = json!({ "name": name, "email": email, "password": PASSWORD });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    server.post("/api/auth/register").json(&body).await.json()
}

/// Sign in and return the bearer token.
pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("token missing")
        .to_string()
}

/// Header value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Create a course as `admin_token` and return its id.
pub async fn create_course(
    server: &TestServer,
    admin_token: &str,
    title: &str,
    instructor_id: Option<i64>,
) -> i64 {
    let mut body = json!({ "title": title });
    if let Some(id) = instructor_id {
        body["instructor_id"] = json!(id);
    }
    let response = server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(admin_token))
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["id"].as_i64().expect("course id missing")
}

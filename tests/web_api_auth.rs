//! Web API Authentication Tests
//!
//! Registration, login and the bearer gate, end to end through the router.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, StatusCode};
use base64::Engine;
use campus::auth::{Claims, TokenService};
use campus::{Role, User, UserRepository};
use common::{bearer, create_test_server, create_test_server_with, create_user, login, register};
use serde_json::{json, Value};

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

fn decode_claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("malformed token");
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .expect("payload is not base64url");
    serde_json::from_slice(&bytes).expect("payload is not JSON")
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "password": "correct-horse-battery"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["name"], "Grace Hopper");
    assert_eq!(body["data"]["user"]["email"], "grace@example.com");
    assert_eq!(body["data"]["user"]["role"], "student");
    assert!(body["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_as_instructor() {
    let (server, _db) = create_test_server().await;

    let body = register(&server, "Alan", "alan@example.com", Some("instructor")).await;
    assert_eq!(body["data"]["user"]["role"], "instructor");
}

#[tokio::test]
async fn test_register_admin_forbidden() {
    let (server, db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Mallory",
            "email": "mallory@example.com",
            "password": "correct-horse-battery",
            "role": "admin"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let repo = UserRepository::new(db.pool());
    assert!(!repo.email_exists("mallory@example.com").await.unwrap());
}

#[tokio::test]
async fn test_register_unknown_role() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Eve",
            "email": "eve@example.com",
            "password": "correct-horse-battery",
            "role": "wizard"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, db) = create_test_server().await;

    let first = register(&server, "First", "dup@example.com", None).await;
    let first_id = first["data"]["user"]["id"].as_i64().unwrap();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Second",
            "email": "dup@example.com",
            "password": "another-password-1",
            "role": "instructor"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");

    // The first account is untouched.
    let user: User = UserRepository::new(db.pool())
        .get_by_id(first_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "First");
    assert_eq!(user.role, Role::Student);
    login(&server, "dup@example.com").await;
}

#[tokio::test]
async fn test_register_invalid_input() {
    let (server, _db) = create_test_server().await;

    let cases = [
        json!({ "name": "", "email": "a@example.com", "password": "correct-horse-battery" }),
        json!({ "name": "Bob", "email": "not-an-email", "password": "correct-horse-battery" }),
        json!({ "name": "Bob", "email": "b@example.com", "password": "short" }),
    ];

    for case in cases {
        let response = server.post("/api/auth/register").json(&case).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{case}");
    }
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .content_type("application/json")
        .bytes("{\"name\":".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_token_subject_matches_user() {
    let (server, db) = create_test_server().await;
    let user = create_user(&db, "Ada", "ada@example.com", Role::Instructor).await;

    let token = login(&server, "ada@example.com").await;
    let claims = decode_claims(&token);
    assert_eq!(claims["sub"], user.id);
    assert_eq!(claims["role"], "instructor");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Ada", "ada@example.com", Role::Student).await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await;
    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "wrong-password" }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>(), unknown_email.json::<Value>());
}

#[tokio::test]
async fn test_login_rate_limited() {
    let mut config = common::test_config();
    config.server.login_rate_limit = 2;
    let (server, _db) = create_test_server_with(config).await;

    let attempt = json!({ "email": "nobody@example.com", "password": "wrong-password" });
    for _ in 0..2 {
        server
            .post("/api/auth/login")
            .json(&attempt)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    let response = server.post("/api/auth/login").json(&attempt).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "TOO_MANY_REQUESTS");
}

#[tokio::test]
async fn test_login_rate_limit_ignores_spoofed_forwarding_headers() {
    let mut config = common::test_config();
    config.server.login_rate_limit = 2;
    let (server, _db) = create_test_server_with(config).await;

    let attempt = json!({ "email": "nobody@example.com", "password": "wrong-password" });
    let mut statuses = Vec::new();
    for i in 0..6 {
        let response = server
            .post("/api/auth/login")
            .add_header(X_FORWARDED_FOR, format!("198.51.100.{i}"))
            .add_header(X_REAL_IP, format!("198.51.100.{i}"))
            .json(&attempt)
            .await;
        statuses.push(response.status_code());
    }

    assert_eq!(&statuses[..2], &[StatusCode::UNAUTHORIZED; 2]);
    assert!(statuses[2..]
        .iter()
        .all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}

#[tokio::test]
async fn test_login_rate_limit_behind_trusted_proxy() {
    let mut config = common::test_config();
    config.server.login_rate_limit = 1;
    config.server.trust_proxy_headers = true;
    let (server, _db) = create_test_server_with(config).await;

    let attempt = json!({ "email": "nobody@example.com", "password": "wrong-password" });
    let login_from = |ip: &'static str| {
        server
            .post("/api/auth/login")
            .add_header(X_FORWARDED_FOR, ip.to_string())
            .json(&attempt)
    };

    login_from("203.0.113.1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    login_from("203.0.113.1")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    login_from("203.0.113.2")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Access Gate Tests
// ============================================================================

#[tokio::test]
async fn test_me_returns_principal() {
    let (server, db) = create_test_server().await;
    let user = create_user(&db, "Ada", "ada@example.com", Role::Student).await;
    let token = login(&server, "ada@example.com").await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], user.id);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_me_without_token() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_malformed_header() {
    let (server, _db) = create_test_server().await;

    for header in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer not.a.jwt"] {
        server
            .get("/api/auth/me")
            .add_header(AUTHORIZATION, header.to_string())
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (server, db) = create_test_server().await;
    let user = create_user(&db, "Ada", "ada@example.com", Role::Admin).await;

    let forged = TokenService::new("some-other-secret-0123456789", 3600)
        .issue(&user)
        .unwrap();

    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&forged))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (server, db) = create_test_server().await;
    let user = create_user(&db, "Ada", "ada@example.com", Role::Student).await;

    let mut claims = Claims::for_user(&user, 3600);
    claims.iat -= 7200;
    claims.exp -= 7200;
    let expired = TokenService::new(common::TEST_SECRET, 3600)
        .sign(&claims)
        .unwrap();

    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&expired))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_rejected() {
    let (server, db) = create_test_server().await;
    let user = create_user(&db, "Ada", "ada@example.com", Role::Student).await;
    let token = login(&server, "ada@example.com").await;

    UserRepository::new(db.pool()).delete(user.id).await.unwrap();

    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

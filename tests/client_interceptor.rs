//! Client Interceptor Tests
//!
//! Drives [`ApiClient`] against a live server bound to an ephemeral port.

mod common;

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use campus::client::{
    ApiClient, ClientError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    RecordingNavigator, SessionUser, StoredCredential, LOGIN_ROUTE,
};
use campus::{Database, Role, UserRepository, WebServer};
use common::{create_user, test_config, PASSWORD};
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct Harness {
    db: Arc<Database>,
    client: ApiClient,
    store: Arc<MemoryCredentialStore>,
    navigator: Arc<RecordingNavigator>,
}

async fn start() -> Harness {
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let server = WebServer::new(&test_config(), db.clone()).unwrap();
    let addr = server.run_with_addr().await.unwrap();

    let store = Arc::new(MemoryCredentialStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::new(
        &format!("http://{addr}"),
        store.clone(),
        navigator.clone(),
    )
    .unwrap();

    Harness {
        db,
        client,
        store,
        navigator,
    }
}

#[tokio::test]
async fn test_login_persists_credential() {
    let h = start().await;
    let user = create_user(&h.db, "Ada", "ada@example.com", Role::Instructor).await;

    let session = h.client.login("ada@example.com", PASSWORD).await.unwrap();
    assert_eq!(session.id, user.id);
    assert_eq!(session.role, Role::Instructor);

    let stored = h.store.load().unwrap().unwrap();
    assert!(!stored.token.is_empty());
    assert_eq!(stored.user, session);
    assert_eq!(h.client.cached_user().unwrap(), Some(session));
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_register_persists_credential() {
    let h = start().await;

    let session = h
        .client
        .register("Grace", "grace@example.com", PASSWORD, None)
        .await
        .unwrap();
    assert_eq!(session.role, Role::Student);
    assert!(h.client.is_authenticated());

    let me = h.client.me().await.unwrap();
    assert_eq!(me, session);
}

#[tokio::test]
async fn test_bearer_attached_when_stored() {
    let h = start().await;
    create_user(&h.db, "Ada", "ada@example.com", Role::Student).await;
    h.client.login("ada@example.com", PASSWORD).await.unwrap();

    let courses: Vec<Value> = h.client.get("/api/courses").await.unwrap();
    assert!(courses.is_empty());
}

/// Serve `GET /echo`, answering with the `Authorization` header it received.
async fn start_echo() -> String {
    async fn echo(headers: HeaderMap) -> Json<Value> {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "data": { "authorization": authorization } }))
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/echo", get(echo)))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_request_without_token_has_no_authorization_header() {
    let store = Arc::new(MemoryCredentialStore::new());
    let client = ApiClient::new(
        &start_echo().await,
        store.clone(),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();

    let seen: Value = client.get("/echo").await.unwrap();
    assert!(seen["authorization"].is_null());

    store
        .save(&StoredCredential {
            token: "stored-token".to_string(),
            user: SessionUser {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: Role::Student,
            },
        })
        .unwrap();
    let seen: Value = client.get("/echo").await.unwrap();
    assert_eq!(seen["authorization"], "Bearer stored-token");
}

#[tokio::test]
async fn test_unauthenticated_protected_call_navigates_to_login() {
    let h = start().await;

    let err = h.client.get::<Vec<Value>>("/api/courses").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(h.navigator.last().as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn test_401_clears_store_and_navigates() {
    let h = start().await;
    let user = create_user(&h.db, "Ada", "ada@example.com", Role::Student).await;
    h.client.login("ada@example.com", PASSWORD).await.unwrap();

    // The account disappears; the token it held is now worthless.
    UserRepository::new(h.db.pool()).delete(user.id).await.unwrap();

    let err = h.client.get::<Vec<Value>>("/api/enrollments/me").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(h.store.load().unwrap(), None);
    assert_eq!(h.client.cached_user().unwrap(), None);
    assert_eq!(h.navigator.visits(), vec![LOGIN_ROUTE]);
}

#[tokio::test]
async fn test_401_from_tampered_token() {
    let h = start().await;
    create_user(&h.db, "Ada", "ada@example.com", Role::Student).await;
    let session = h.client.login("ada@example.com", PASSWORD).await.unwrap();

    h.store
        .save(&StoredCredential {
            token: "eyJhbGciOiJIUzI1NiJ9.e30.forged".to_string(),
            user: session,
        })
        .unwrap();

    let err = h.client.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(h.store.load().unwrap(), None);
    assert_eq!(h.navigator.last().as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn test_403_keeps_credential() {
    let h = start().await;
    create_user(&h.db, "Stu", "stu@example.com", Role::Student).await;
    h.client.login("stu@example.com", PASSWORD).await.unwrap();

    let err = h
        .client
        .post::<_, Value>("/api/courses", &json!({ "title": "Nope" }))
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, code, .. } => {
            assert_eq!(status, 403);
            assert_eq!(code, "FORBIDDEN");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.client.is_authenticated());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_failed_login_is_a_401() {
    let h = start().await;
    create_user(&h.db, "Ada", "ada@example.com", Role::Student).await;

    let err = h
        .client
        .login("ada@example.com", "wrong-password")
        .await
        .unwrap_err();
    match err {
        ClientError::Unauthorized(message) => assert_eq!(message, "Invalid email or password"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!h.client.is_authenticated());
    assert_eq!(h.navigator.last().as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn test_enroll_and_unenroll_through_client() {
    let h = start().await;
    create_user(&h.db, "Admin", "admin@example.com", Role::Admin).await;
    create_user(&h.db, "Stu", "stu@example.com", Role::Student).await;

    h.client.login("admin@example.com", PASSWORD).await.unwrap();
    let course: Value = h
        .client
        .post("/api/courses", &json!({ "title": "Type Theory" }))
        .await
        .unwrap();
    let id = course["id"].as_i64().unwrap();
    h.client.logout().unwrap();
    assert!(!h.client.is_authenticated());

    h.client.login("stu@example.com", PASSWORD).await.unwrap();
    let enrollment: Value = h
        .client
        .post(&format!("/api/courses/{id}/enrollment"), &json!({}))
        .await
        .unwrap();
    assert_eq!(enrollment["course_id"], id);

    h.client
        .delete(&format!("/api/courses/{id}/enrollment"))
        .await
        .unwrap();
    let mine: Vec<Value> = h.client.get("/api/enrollments/me").await.unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_file_store_survives_new_client() {
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let server = WebServer::new(&test_config(), db.clone()).unwrap();
    let addr = server.run_with_addr().await.unwrap();
    create_user(&db, "Ada", "ada@example.com", Role::Student).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let base = format!("http://{addr}");

    let first = ApiClient::new(
        &base,
        Arc::new(FileCredentialStore::new(&path)),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    first.login("ada@example.com", PASSWORD).await.unwrap();

    let second = ApiClient::new(
        &base,
        Arc::new(FileCredentialStore::new(&path)),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    assert_eq!(second.me().await.unwrap().email, "ada@example.com");
}

//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    course_roster, create_course, delete_course, delete_user, enroll, get_course, get_user,
    list_courses, list_users, login, me, my_enrollments, register, unenroll, update_course,
    update_me, update_user_role, AppState,
};
use super::middleware::{create_cors_layer, inject_gate, login_rate_limit, RateLimitState};
use crate::auth::AccessGate;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    gate: Arc<AccessGate>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    // Only login is throttled; registration is bounded by email uniqueness.
    let login_route = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            login_rate_limit(state, req, next)
        }));

    let auth_routes = Router::new()
        .merge(login_route)
        .route("/register", post(register))
        .route("/me", get(me));

    let user_routes = Router::new()
        .route("/", get(list_users))
        .route("/me", put(update_me))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/role", put(update_user_role));

    let course_routes = Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/:id/enrollment", post(enroll).delete(unenroll))
        .route("/:id/enrollments", get(course_roster));

    let enrollment_routes = Router::new().route("/me", get(my_enrollments));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/courses", course_routes)
        .nest("/enrollments", enrollment_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let gate = gate.clone();
                    inject_gate(gate, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::db::Database;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let tokens = TokenService::new("router-test-secret-0123456", 60);
        let gate = Arc::new(AccessGate::new(db.clone(), tokens.clone()));
        let router = create_router(
            Arc::new(AppState::new(db, tokens)),
            gate,
            Arc::new(RateLimitState::new(10)),
            &[],
        );

        let response = router
            .oneshot(Request::get("/api/courses").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

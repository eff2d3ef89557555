//! Web API Course and Enrollment Tests

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use campus::Role;
use common::{bearer, create_course, create_test_server, create_user, login};
use serde_json::{json, Value};

#[tokio::test]
async fn test_course_crud() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let ins = create_user(&db, "Ins", "ins@example.com", Role::Instructor).await;
    let admin = login(&server, "admin@example.com").await;

    let response = server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({
            "title": "Compilers",
            "description": "Lexing to codegen",
            "instructor_id": ins.id
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let course: Value = response.json();
    let id = course["data"]["id"].as_i64().unwrap();
    assert_eq!(course["data"]["instructor_id"], ins.id);

    let response = server
        .get(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["title"], "Compilers");

    let response = server
        .put(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "title": "Compilers II", "description": null }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["data"]["title"], "Compilers II");
    assert!(updated["data"].get("description").is_none());
    assert_eq!(updated["data"]["instructor_id"], ins.id);

    let response = server
        .get("/api/courses")
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_list_requires_token() {
    let (server, _db) = create_test_server().await;
    server
        .get("/api/courses")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_course_admin_only() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Ins", "ins@example.com", Role::Instructor).await;
    create_user(&db, "Stu", "stu@example.com", Role::Student).await;

    for email in ["ins@example.com", "stu@example.com"] {
        let token = login(&server, email).await;
        server
            .post("/api/courses")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "title": "Sneaky" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_create_course_validation() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let stu = create_user(&db, "Stu", "stu@example.com", Role::Student).await;
    let admin = login(&server, "admin@example.com").await;

    server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "title": "   " }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // A student cannot be assigned as instructor.
    server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({ "title": "Algebra", "instructor_id": stu.id }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_instructor_updates_own_course_only() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let ins = create_user(&db, "Ins", "ins@example.com", Role::Instructor).await;
    let other = create_user(&db, "Other", "other@example.com", Role::Instructor).await;
    let admin = login(&server, "admin@example.com").await;
    let id = create_course(&server, &admin, "Databases", Some(ins.id)).await;

    let token = login(&server, "ins@example.com").await;
    server
        .put(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "description": "B-trees and WAL" }))
        .await
        .assert_status_ok();

    // Reassignment stays with admins.
    server
        .put(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "instructor_id": other.id }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let other_token = login(&server, "other@example.com").await;
    server
        .put(&format!("/api/courses/{id}"))
        .add_header(AUTHORIZATION, bearer(&other_token))
        .json(&json!({ "title": "Hijacked" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_enrollment_flow() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let stu = create_user(&db, "Stu", "stu@example.com", Role::Student).await;
    let admin = login(&server, "admin@example.com").await;
    let id = create_course(&server, &admin, "Networks", None).await;
    let student = login(&server, "stu@example.com").await;

    let response = server
        .post(&format!("/api/courses/{id}/enrollment"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await;
    response.assert_status(StatusCode::CREATED);
    let enrollment: Value = response.json();
    assert_eq!(enrollment["data"]["user_id"], stu.id);
    assert_eq!(enrollment["data"]["course_id"], id);

    server
        .post(&format!("/api/courses/{id}/enrollment"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server
        .get("/api/enrollments/me")
        .add_header(AUTHORIZATION, bearer(&student))
        .await;
    response.assert_status_ok();
    let mine: Value = response.json();
    assert_eq!(mine["data"][0]["title"], "Networks");

    server
        .delete(&format!("/api/courses/{id}/enrollment"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/courses/{id}/enrollment"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enroll_in_missing_course() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Stu", "stu@example.com", Role::Student).await;
    let student = login(&server, "stu@example.com").await;

    server
        .post("/api/courses/4242/enrollment")
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_roster_access() {
    let (server, db) = create_test_server().await;
    create_user(&db, "Admin", "admin@example.com", Role::Admin).await;
    let ins = create_user(&db, "Ins", "ins@example.com", Role::Instructor).await;
    create_user(&db, "Other", "other@example.com", Role::Instructor).await;
    create_user(&db, "Stu", "stu@example.com", Role::Student).await;
    let admin = login(&server, "admin@example.com").await;
    let id = create_course(&server, &admin, "Operating Systems", Some(ins.id)).await;

    let student = login(&server, "stu@example.com").await;
    server
        .post(&format!("/api/courses/{id}/enrollment"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .get(&format!("/api/courses/{id}/enrollments"))
        .add_header(AUTHORIZATION, bearer(&student))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let other = login(&server, "other@example.com").await;
    server
        .get(&format!("/api/courses/{id}/enrollments"))
        .add_header(AUTHORIZATION, bearer(&other))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    for token in [login(&server, "ins@example.com").await, admin] {
        let response = server
            .get(&format!("/api/courses/{id}/enrollments"))
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        response.assert_status_ok();
        let roster: Value = response.json();
        let entries = roster["data"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["email"], "stu@example.com");
    }
}

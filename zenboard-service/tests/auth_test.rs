//! Registration and password login tests.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn register_creates_pending_principal_with_tokens() {
    let app = TestApp::spawn();
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "new@example.com", "password": "correct-horse-battery", "name": "New" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["principal"]["email"], "new@example.com");
    assert_eq!(body["principal"]["status"], "pending_review");
    assert_eq!(body["principal"]["role"], "member");
    // The hash never leaves the service.
    assert!(body["principal"].get("password_hash").is_none());
    assert!(body["tokens"]["access_token"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn();
    app.register("dup@example.com").await;

    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "dup@example.com", "password": "correct-horse-battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn password_login_round_trip() {
    let app = TestApp::spawn();
    app.register("login@example.com").await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "login@example.com", "password": "correct-horse-battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let access = body["access_token"].as_str().unwrap();
    let (status, me) = app.get("/users/me", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "login@example.com");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() {
    let app = TestApp::spawn();
    app.register("victim@example.com").await;

    let (wrong_status, wrong_body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "victim@example.com", "password": "incorrect-password" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "incorrect-password" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn short_password_fails_validation() {
    let app = TestApp::spawn();
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "short@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "ValidationError");
}

//! Token lifecycle tests at the HTTP boundary.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn refresh_rotates_the_pair() {
    let app = TestApp::spawn();
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "rot@example.com", "password": "correct-horse-battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let refresh = body["tokens"]["refresh_token"].as_str().unwrap();

    let (status, body) = app
        .post("/auth/token/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());

    // Rotation is stateless: the new access token works immediately.
    let access = body["access_token"].as_str().unwrap();
    let (status, _) = app.get("/users/me", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn access_token_cannot_be_refreshed() {
    let app = TestApp::spawn();
    let (_, access) = app.register("kinds@example.com").await;

    let (status, body) = app
        .post("/auth/token/refresh", None, json!({ "refresh_token": access }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "WrongKind");
}

#[tokio::test]
async fn refresh_token_cannot_reach_protected_routes() {
    let app = TestApp::spawn();
    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "gate@example.com", "password": "correct-horse-battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let refresh = body["tokens"]["refresh_token"].as_str().unwrap();

    let (status, body) = app.get("/users/me", Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "WrongKind");
}

#[tokio::test]
async fn access_token_expires_at_the_boundary() {
    let app = TestApp::spawn();
    let (_, access) = app.register("ttl@example.com").await;

    // Config pins access tokens to five minutes. One second shy still works.
    app.advance_seconds(5 * 60 - 1);
    let (status, _) = app.get("/users/me", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);

    // At exactly the expiry instant the token is dead.
    app.advance_seconds(1);
    let (status, body) = app.get("/users/me", Some(&access)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "Expired");
}

#[tokio::test]
async fn garbage_and_tampered_tokens_are_rejected() {
    let app = TestApp::spawn();
    let (_, access) = app.register("tamper@example.com").await;

    let (status, body) = app.get("/users/me", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "Malformed");

    // Flip the signature segment.
    let mut parts: Vec<&str> = access.split('.').collect();
    let tampered_sig = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    parts[2] = tampered_sig;
    let tampered = parts.join(".");
    let (status, body) = app.get("/users/me", Some(&tampered)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "InvalidSignature");
}

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let app = TestApp::spawn();
    let (status, body) = app.get("/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "Unauthorized");
}

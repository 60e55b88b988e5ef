//! End-to-end QR/OAuth handshake tests.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, SESSION_TTL_SECONDS};
use serde_json::json;

async fn start_session(app: &TestApp) -> String {
    let (status, body) = app.post("/auth/login/start", None, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["presentation_url"]
        .as_str()
        .unwrap()
        .contains(body["session_id"].as_str().unwrap()));
    assert_eq!(body["expires_in_seconds"].as_i64(), Some(SESSION_TTL_SECONDS));
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_handshake_ends_with_usable_tokens() {
    let app = TestApp::spawn();
    let session_id = start_session(&app).await;

    // Nobody has scanned yet.
    let (status, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    // Phone scans and the provider calls back.
    let (status, _) = app
        .request(
            Method::GET,
            &format!("/auth/login/callback?proof=alice&state={}", session_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The poll now carries a token pair.
    let (status, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    let access = body["access_token"].as_str().unwrap();
    assert!(body["refresh_token"].as_str().is_some());

    // And the access token resolves a real principal.
    let (status, me) = app.get("/users/me", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Scan User alice");
    assert_eq!(me["status"], "pending_review");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = TestApp::spawn();
    let (status, body) = app
        .get("/auth/login/status?session_id=no-such-session", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SessionNotFound");
}

#[tokio::test]
async fn second_callback_loses_the_race() {
    let app = TestApp::spawn();
    let session_id = start_session(&app).await;

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/auth/login/callback?proof=alice&state={}", session_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // A replayed or duplicate callback must not rebind the session.
    let (status, body) = app
        .request(
            Method::GET,
            &format!("/auth/login/callback?proof=mallory&state={}", session_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SessionAlreadyTerminal");

    // The winner's identity is the one the poll hands out.
    let (_, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    let access = body["access_token"].as_str().unwrap();
    let (_, me) = app.get("/users/me", Some(access)).await;
    assert_eq!(me["name"], "Scan User alice");
}

#[tokio::test]
async fn session_expires_after_ttl() {
    let app = TestApp::spawn();
    let session_id = start_session(&app).await;

    // One second shy of the deadline the session still pends.
    app.advance_seconds(SESSION_TTL_SECONDS - 1);
    let (_, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    assert_eq!(body["status"], "pending");

    // At the deadline it reads as expired.
    app.advance_seconds(1);
    let (status, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "expired");

    // A late scan cannot resurrect it.
    let (status, body) = app
        .request(
            Method::GET,
            &format!("/auth/login/callback?proof=alice&state={}", session_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SessionAlreadyTerminal");
}

#[tokio::test]
async fn provider_failure_surfaces_as_bad_gateway() {
    let app = TestApp::spawn();
    let session_id = start_session(&app).await;

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/auth/login/callback?proof=fail-now&state={}", session_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UpstreamError");

    // The session is untouched and a later successful scan still wins.
    let (_, body) = app
        .get(&format!("/auth/login/status?session_id={}", session_id), None)
        .await;
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn repeat_login_reuses_the_same_principal() {
    let app = TestApp::spawn();

    for _ in 0..2 {
        let session_id = start_session(&app).await;
        let (status, _) = app
            .request(
                Method::GET,
                &format!("/auth/login/callback?proof=alice&state={}", session_id),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.db.count_principals().await, 1);
}

//! Authentication API Tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use crate::common::{body_json, issue_token, issue_token_expiring, trip_body, TestApp};

#[tokio::test]
async fn test_missing_authorization_header_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/trips").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Missing authorization header");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/api/v1/trips")
        .header("Authorization", "Basic YWxpY2U6c2VjcmV0")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Invalid authorization header format"
    );
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/trips", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = TestApp::new().await;
    let token = issue_token_expiring("alice", -3600);

    let response = app.get_auth("/api/v1/trips", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Token expired");
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized() {
    let app = TestApp::new().await;
    let body = trip_body("Ski Trip", Utc::now().date_naive());

    let response = app
        .post_json_auth("/api/v1/trips", &body.to_string(), &issue_token("ghost"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Unauthorized user");
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/trips", &issue_token("alice")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

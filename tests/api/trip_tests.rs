//! Trip API Tests

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use trip_diary::domain::NotificationType;

use crate::common::{body_json, issue_token, trip_body, TestApp};

fn in_days(days: i64) -> chrono::NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

#[tokio::test]
async fn test_create_trip_returns_created_trip() {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth(
            "/api/v1/trips",
            &trip_body("Ski Trip", in_days(30)).to_string(),
            &issue_token("alice"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Ski Trip");
    assert_eq!(json["owner"], "alice");
    assert_eq!(json["destination"], "Alps");
    assert_eq!(json["notify_before"], 3);
    assert_eq!(json["is_public"], true);
    assert_eq!(json["members"], json!([{ "id": app.alice.id, "username": "alice" }]));
}

#[tokio::test]
async fn test_create_trip_applies_defaults() {
    let app = TestApp::new().await;
    let body = json!({
        "name": "Weekend",
        "destination": "Coast",
        "begin_date": in_days(5).to_string(),
    });

    let response = app
        .post_json_auth("/api/v1/trips", &body.to_string(), &issue_token("alice"))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["notify_before"], 1);
    assert_eq!(json["is_public"], true);
    assert_eq!(json["end_date"], serde_json::Value::Null);
}

#[test_case("" ; "empty body")]
#[test_case("null" ; "json null")]
#[tokio::test]
async fn test_create_trip_without_body_is_rejected(body: &str) {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth("/api/v1/trips", body, &issue_token("alice"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Trip information is required"
    );
}

#[test_case(json!({ "destination": "Alps", "begin_date": "2030-01-10" }), "Trip's name is required" ; "missing name")]
#[test_case(json!({ "name": "  ", "destination": "Alps", "begin_date": "2030-01-10" }), "Trip's name is required" ; "blank name")]
#[test_case(json!({ "name": "Ski", "begin_date": "2030-01-10" }), "Trip's destination is required" ; "missing destination")]
#[test_case(json!({ "name": "Ski", "destination": "Alps" }), "Trip's start day is required" ; "missing begin date")]
#[test_case(json!({ "name": "Ski", "destination": "Alps", "begin_date": "2030-01-10", "end_date": "2030-01-09" }), "Trip's end date must not be before trip's start day" ; "end before begin")]
#[test_case(json!({ "name": "Ski", "destination": "Alps", "begin_date": "2030-01-10", "notify_before": 0 }), "Trip should be announced at least 1 day earlier than its starting" ; "zero notice")]
#[tokio::test]
async fn test_create_trip_validation(body: serde_json::Value, message: &str) {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth("/api/v1/trips", &body.to_string(), &issue_token("alice"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], message);
}

#[tokio::test]
async fn test_create_trip_with_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth("/api/v1/trips", "{\"name\": ", &issue_token("alice"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_trip() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .get_auth(&format!("/api/v1/trips/{}", id), &issue_token("bob"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id);
}

#[tokio::test]
async fn test_get_missing_trip_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/trips/999", &issue_token("alice")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Trip with ID \"999\" doesn't exist"
    );
}

#[tokio::test]
async fn test_non_numeric_trip_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/trips/abc", &issue_token("alice")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trip_exists() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    let token = issue_token("alice");

    let found = app
        .get_auth(&format!("/api/v1/trips/{}/exists", id), &token)
        .await;
    let missing = app.get_auth("/api/v1/trips/999/exists", &token).await;

    assert_eq!(body_json(found).await, json!({ "exists": true }));
    assert_eq!(body_json(missing).await, json!({ "exists": false }));
}

#[tokio::test]
async fn test_list_trips_pages_public_trips_by_begin_date() {
    let app = TestApp::new().await;
    app.create_trip("alice", trip_body("Later", in_days(20))).await;
    app.create_trip("alice", trip_body("Sooner", in_days(10))).await;
    let mut private = trip_body("Secret", in_days(1));
    private["is_public"] = json!(false);
    app.create_trip("bob", private).await;

    let response = app
        .get_auth("/api/v1/trips?page=1&size=1", &issue_token("carol"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 2);
    assert_eq!(json["total_pages"], 2);
    assert_eq!(json["items"][0]["name"], "Sooner");
    assert_eq!(json["has_next"], true);
}

#[test_case("page=0" ; "zero page")]
#[test_case("page=1&size=0" ; "zero size")]
#[test_case("page=9223372036854775807&size=100" ; "offset overflow")]
#[tokio::test]
async fn test_list_trips_rejects_bad_paging(query: &str) {
    let app = TestApp::new().await;

    let response = app
        .get_auth(&format!("/api/v1/trips?{}", query), &issue_token("alice"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_public_only() {
    let app = TestApp::new().await;
    app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    app.create_trip("alice", trip_body("Beach Week", in_days(40))).await;
    let mut private = trip_body("Private Ski", in_days(50));
    private["is_public"] = json!(false);
    app.create_trip("bob", private).await;

    let response = app
        .get_auth("/api/v1/trips/search?keyword=SKI", &issue_token("carol"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ski Trip"]);
}

#[tokio::test]
async fn test_search_without_keyword_is_empty() {
    let app = TestApp::new().await;
    app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .get_auth("/api/v1/trips/search", &issue_token("alice"))
        .await;

    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_update_trip_replaces_destination() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    let body = json!({
        "name": "Ski Trip II",
        "destination": "Dolomites",
        "begin_date": in_days(31).to_string(),
        "end_date": in_days(35).to_string(),
        "notify_before": 2,
    });

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("alice")),
            Some(&body.to_string()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Ski Trip II");
    assert_eq!(json["destination"], "Dolomites");
    assert_eq!(json["notify_before"], 2);
    let deleted = app.store.deleted_destinations();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].name, "Alps");
}

#[tokio::test]
async fn test_update_trip_by_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("bob")),
            Some(&trip_body("Hijacked", in_days(30)).to_string()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["message"],
        "You have no permission to update this trip"
    );
    assert_eq!(app.store.trip(id).unwrap().name, "Ski Trip");
}

#[tokio::test]
async fn test_update_trip_with_invalid_body_keeps_destination() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("alice")),
            Some(&json!({ "name": "No Destination" }).to_string()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.deleted_destinations().is_empty());
}

#[tokio::test]
async fn test_delete_trip_by_member() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("alice")),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["deleted"], true);
    assert_eq!(json["trip"]["id"], id);
    assert!(app.store.trip(id).is_none());
}

#[tokio::test]
async fn test_delete_trip_by_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("bob")),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.store.trip(id).is_some());
}

#[tokio::test]
async fn test_delete_trip_by_admin_bypasses_membership() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("root")),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.store.trip(id).is_none());
}

#[tokio::test]
async fn test_delete_trip_store_failure_reports_trip() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    app.store.fail_deletes();

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("alice")),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["deleted"], false);
    assert_eq!(json["trip"]["name"], "Ski Trip");
    assert!(app.store.trip(id).is_some());
}

#[tokio::test]
async fn test_invite_trip_mate_by_email() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/trips/{}/mates", id),
            &json!({ "username_or_email": "bob@example.com" }).to_string(),
            &issue_token("alice"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["mail_delivered"], true);
    assert_eq!(json["trip"]["members"].as_array().unwrap().len(), 2);

    let notifications = app.store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, NotificationType::Invitation);
    assert_eq!(notifications[0].user_id, app.bob.id);
    assert_eq!(json["notification_id"], notifications[0].id);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@example.com");
}

#[tokio::test]
async fn test_invite_same_mate_twice_is_rejected() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    let uri = format!("/api/v1/trips/{}/mates", id);
    let body = json!({ "username_or_email": "bob" }).to_string();
    let token = issue_token("alice");

    let first = app.post_json_auth(&uri, &body, &token).await;
    let second = app.post_json_auth(&uri, &body, &token).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(second).await["message"],
        "bob was invited to join this trip before"
    );
    assert_eq!(app.mailer.sent().len(), 1);
    assert_eq!(app.store.notifications().len(), 1);
}

#[test_case("alice", "alice is this trip's owner" ; "owner")]
#[test_case("nobody", "User with username or email \"nobody\" doesn't exist" ; "unknown user")]
#[tokio::test]
async fn test_invite_rejections(invitee: &str, message: &str) {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/trips/{}/mates", id),
            &json!({ "username_or_email": invitee }).to_string(),
            &issue_token("alice"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], message);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_invite_by_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/trips/{}/mates", id),
            &json!({ "username_or_email": "carol" }).to_string(),
            &issue_token("bob"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invite_keeps_membership_when_mail_fails() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    app.mailer.fail();

    let response = app
        .post_json_auth(
            &format!("/api/v1/trips/{}/mates", id),
            &json!({ "username_or_email": "bob" }).to_string(),
            &issue_token("alice"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["mail_delivered"], false);
    assert!(app.store.trip(id).unwrap().has_member("bob"));
}

#[tokio::test]
async fn test_invited_mate_can_update_trip() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    app.post_json_auth(
        &format!("/api/v1/trips/{}/mates", id),
        &json!({ "username_or_email": "bob" }).to_string(),
        &issue_token("alice"),
    )
    .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/trips/{}", id),
            Some(&issue_token("bob")),
            Some(&trip_body("Bob's Edit", in_days(30)).to_string()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["owner"], "alice");
}

#[tokio::test]
async fn test_remove_trip_mate() {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;
    let token = issue_token("alice");
    app.post_json_auth(
        &format!("/api/v1/trips/{}/mates", id),
        &json!({ "username_or_email": "bob" }).to_string(),
        &token,
    )
    .await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}/mates/bob", id),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["members"].as_array().unwrap().len(), 1);
    assert!(!app.store.trip(id).unwrap().has_member("bob"));
}

#[test_case("alice", "alice is this trip's owner" ; "owner")]
#[test_case("carol", "carol was not invited to join this trip before" ; "not a mate")]
#[tokio::test]
async fn test_remove_trip_mate_rejections(mate: &str, message: &str) {
    let app = TestApp::new().await;
    let id = app.create_trip("alice", trip_body("Ski Trip", in_days(30))).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/trips/{}/mates/{}", id, mate),
            Some(&issue_token("alice")),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], message);
}

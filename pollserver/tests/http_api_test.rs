//! HTTP surface tests
//!
//! Drive a real server on an ephemeral port through reqwest.

mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};

use common::fixtures::*;
use common::helpers::*;
use pollserver::{DeviceAdapter, DeviceCommand};
use shared::{ErrorReply, ResultsReply, SessionStatusReply};

#[tokio::test]
async fn test_health_check() {
    let server = spawn_test_server().await;

    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_class_setup_reports_completion() {
    let server = spawn_test_server().await;

    let response = server.post("/class/setup", &single_student_class()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "class setup complete" }));

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.state, "roster_configured");
    assert_eq!(status.class_name.as_deref(), Some("8B"));
    assert_eq!(status.student_count, 1);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_class_name_limit_over_http() {
    let server = spawn_test_server().await;

    let mut body = single_student_class();
    body["className"] = json!("ABCDEFGHI");
    let response = server.post("/class/setup", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "invalid_roster_name");

    body["className"] = json!("ABCDEFGH");
    assert_eq!(server.post("/class/setup", &body).await.status(), StatusCode::OK);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_class_without_valid_students_is_rejected() {
    let server = spawn_test_server().await;

    let body = json!({ "className": "8B", "students": [{ "last": "Doe", "first": "Jane" }] });
    let response = server.post("/class/setup", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.error, "No valid students");

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.state, "idle");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_student_ids_keep_first() {
    let server = spawn_test_server().await;

    let body = json!({
        "className": "8B",
        "students": [
            { "last": "Doe", "first": "Jane", "id": "7" },
            { "last": "Roe", "first": "Rick", "id": "7" },
            { "last": "Poe", "first": "Edgar", "id": "8" }
        ]
    });
    assert_eq!(server.post("/class/setup", &body).await.status(), StatusCode::OK);

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.student_count, 2);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let server = spawn_test_server().await;

    let response = server
        .client
        .post(server.url("/class/setup"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "malformed_request");

    let missing = server.post("/class/setup", &json!({ "className": "8B" })).await;
    let error: ErrorReply = missing.json().await.unwrap();
    assert_eq!(error.kind, "missing_field");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_start_before_setup_fails() {
    let server = spawn_test_server().await;

    let response = server.post("/poll/start", &multiple_choice_question()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.error, "No class/students setup. Use /class/setup first.");
    assert_eq!(error.kind, "no_roster_configured");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_bodyless_start_follows_session_state() {
    let server = spawn_test_server().await;

    let response = server.post_empty("/poll/start").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "no_roster_configured");

    server.post("/class/setup", &single_student_class()).await;
    let response = server.post_empty("/poll/start").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "malformed_request");

    server.post("/poll/start", &yes_no_question()).await;
    let response = server.post_empty("/poll/start").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "already running" }));

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.state, "active");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_start_and_stop_are_idempotent() {
    let server = spawn_test_server().await;
    server.post("/class/setup", &single_student_class()).await;

    let first: Value = server.post("/poll/start", &multiple_choice_question()).await.json().await.unwrap();
    assert_eq!(first["status"], "poll started");
    let question_id = server.get_json::<SessionStatusReply>("/status").await.question.unwrap().id;

    let second: Value = server.post("/poll/start", &yes_no_question()).await.json().await.unwrap();
    assert_eq!(second["status"], "already running");
    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.question.unwrap().id, question_id);

    let stopped: Value = server.post_empty("/poll/stop").await.json().await.unwrap();
    assert_eq!(stopped["status"], "poll stopped");
    let again: Value = server.post_empty("/poll/stop").await.json().await.unwrap();
    assert_eq!(again["status"], "no poll running");

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.state, "stopped");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_choice_count_leaves_state_unchanged() {
    let server = spawn_test_server().await;
    server.post("/class/setup", &single_student_class()).await;

    let body = json!({ "question": "2+2?", "type": "multiplechoice", "choices": ["A"] });
    let response = server.post("/poll/start", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "invalid_choice_count");

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.state, "roster_configured");
    assert!(status.question.is_none());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_setup_while_poll_active_conflicts() {
    let server = spawn_test_server().await;
    server.post("/class/setup", &single_student_class()).await;
    server.post("/poll/start", &yes_no_question()).await;

    let response = server.post("/class/setup", &class_of(3)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorReply = response.json().await.unwrap();
    assert_eq!(error.kind, "poll_active");

    let status: SessionStatusReply = server.get_json("/status").await;
    assert_eq!(status.class_name.as_deref(), Some("8B"));
    assert_eq!(status.state, "active");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_results_empty_before_any_poll() {
    let server = spawn_test_server().await;

    let results: ResultsReply = server.get_json("/poll/results").await;
    assert!(results.results.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = spawn_test_server().await;
    assert_eq!(server.get("/nowhere").await.status(), StatusCode::NOT_FOUND);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_cors_allows_other_origins() {
    let server = spawn_test_server().await;

    let response = server
        .client
        .get(server.url("/health"))
        .header("origin", "http://frontend.local")
        .send()
        .await
        .unwrap();
    assert!(response.headers().contains_key("access-control-allow-origin"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_releases_device_session() {
    let server = spawn_test_server().await;
    server.post("/class/setup", &single_student_class()).await;
    server.post("/poll/start", &yes_no_question()).await;

    let adapter = server.adapter().clone();
    server.stop().await.unwrap();

    let commands = adapter.commands().await;
    let tail: Vec<_> = commands[commands.len() - 3..].to_vec();
    assert_eq!(tail, vec![DeviceCommand::StopQuestion, DeviceCommand::StopClass, DeviceCommand::Disconnect]);
    assert!(!adapter.is_connected().await);
}

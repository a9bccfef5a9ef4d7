//! Tests for return handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::in_memory_app;

fn post(uri: &str, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request()
}

#[actix_web::test]
async fn returning_a_copy_matches_case_insensitively_once() {
    let (_ledger, app) = in_memory_app();
    let app = actix_test::init_service(app).await;
    let _: Value = actix_test::call_and_read_body_json(
        &app,
        post(
            "/api/upload",
            json!({"rows": [{"student_email": "a@b.com", "copy_uid": "X-1", "due_at": "2025-12-01"}]}),
        ),
    )
    .await;

    let first: Value =
        actix_test::call_and_read_body_json(&app, post("/api/return", json!({"copy_uid": "x-1"})))
            .await;
    assert_eq!(first, json!({"ok": true, "version": 2}));

    let second: Value =
        actix_test::call_and_read_body_json(&app, post("/api/return", json!({"copy_uid": "X-1"})))
            .await;
    assert_eq!(second, json!({"ok": true, "version": 2}));

    let rows: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/rows").to_request(),
    )
    .await;
    assert_eq!(rows["rows"][0]["status"], json!("returned"));
}

#[actix_web::test]
async fn return_all_counts_only_issued_copies() {
    let (_ledger, app) = in_memory_app();
    let app = actix_test::init_service(app).await;
    let _: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post().uri("/api/load-sample").to_request(),
    )
    .await;
    let _: Value = actix_test::call_and_read_body_json(
        &app,
        post("/api/return", json!({"copy_uid": "SIGSYS-3e#00020"})),
    )
    .await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        post("/api/return-all", json!({"student_email": " SRAO22@bits.edu "})),
    )
    .await;
    assert_eq!(body, json!({"ok": true, "version": 3, "count": 1}));
}

#[rstest]
#[case("/api/return", json!({"copy_uid": "  "}), "copy_uid required")]
#[case("/api/return", json!({}), "copy_uid required")]
#[case("/api/return-all", json!({"student_email": ""}), "student_email required")]
#[actix_web::test]
async fn blank_identifiers_are_rejected(
    #[case] uri: &str,
    #[case] body: Value,
    #[case] message: &str,
) {
    let (_ledger, app) = in_memory_app();
    let app = actix_test::init_service(app).await;

    let response = actix_test::call_service(&app, post(uri, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["message"], json!(message));
}

//! Tests for reminder log and reset handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use crate::domain::LedgerEvent;
use crate::inbound::http::test_utils::in_memory_app;

fn reminder(to: &str) -> Value {
    json!({
        "to": to,
        "name": "Asha",
        "subject": "Overdue: Optics",
        "body": "Please return Optics.",
        "mode": "per_copy",
        "sent_at": "2025-12-02T09:00:00Z",
        "books": [{"book_title": "Optics", "copy_uid": "X-1", "student_email": to}]
    })
}

#[actix_web::test]
async fn recorded_emails_are_logged_broadcast_and_dispatched() {
    let (ledger, app) = in_memory_app();
    let app = actix_test::init_service(app).await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/emails")
            .set_json(json!({"entries": [reminder("a@b.com"), reminder("c@d.com")], "originId": "tab-7"}))
            .to_request(),
    )
    .await;
    assert_eq!(body, json!({"ok": true, "count": 2}));

    let log: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/emails").to_request(),
    )
    .await;
    assert_eq!(log["logs"].as_array().map(Vec::len), Some(2));
    assert_eq!(log["logs"][1]["to"], json!("c@d.com"));
    assert_eq!(log["logs"][0]["sent_at"], json!("2025-12-02T09:00:00Z"));

    match ledger.broadcaster.events().as_slice() {
        [LedgerEvent::EmailsSent { entries, origin_id }] => {
            assert_eq!(entries.len(), 2);
            assert_eq!(origin_id.as_deref(), Some("tab-7"));
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(ledger.mailer.dispatched().len(), 2);
}

#[actix_web::test]
async fn reset_requires_confirmation() {
    let (ledger, app) = in_memory_app();
    let app = actix_test::init_service(app).await;
    let _: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post().uri("/api/load-sample").to_request(),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/reset")
            .set_json(json!({"confirm": "WRONG"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["message"],
        json!("Confirmation required. Send {confirm:'RESET'}")
    );
    assert_eq!(ledger.repo.stored().map(|s| s.version), Some(1));

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/reset")
            .set_json(json!({"confirm": "RESET"}))
            .to_request(),
    )
    .await;
    assert_eq!(body, json!({"ok": true, "version": 2}));

    let rows: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri("/api/rows").to_request(),
    )
    .await;
    assert_eq!(rows, json!({"version": 2, "rows": []}));
}

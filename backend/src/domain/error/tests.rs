//! Tests for error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let err = Error::new(ErrorCode::Conflict, "");
    assert_eq!(err.message(), "Conflict");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id = TraceId::from_uuid(uuid::Uuid::nil());
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(
        err.trace_id(),
        Some("00000000-0000-0000-0000-000000000000")
    );
}

#[rstest]
fn serialises_camel_case_payload() {
    let err = Error::invalid_request("Validation failed")
        .try_with_trace_id("abc")
        .expect("trace id")
        .with_details(json!({ "errors": ["Row 2: missing copy_uid"] }));
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "Validation failed",
            "traceId": "abc",
            "details": { "errors": ["Row 2: missing copy_uid"] }
        })
    );
}

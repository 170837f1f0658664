//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn upstream_error() -> Error {
    Error::upstream("image host returned 502")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "upstreamStatus": 502 }))
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::missing(Error::not_found("gone"), ErrorCode::NotFound)]
#[case::upstream(Error::upstream("rejected"), ErrorCode::UpstreamFailure)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn trace_id_is_absent_outside_request_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_inside_request_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_envelope(upstream_error: Error) {
    let value = serde_json::to_value(&upstream_error).expect("serialise error");
    assert_eq!(value["code"], "upstream_failure");
    assert_eq!(value["message"], "image host returned 502");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["upstreamStatus"], 502);
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::invalid_request("bad")).expect("serialise error");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("traceId"));
    assert!(!object.contains_key("details"));
}

#[rstest]
fn display_uses_message(upstream_error: Error) {
    assert_eq!(upstream_error.to_string(), "image host returned 502");
}

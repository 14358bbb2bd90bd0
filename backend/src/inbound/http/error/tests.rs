//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::Value;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::insufficient_funds(), StatusCode::BAD_REQUEST)]
#[case(Error::user_not_found(), StatusCode::NOT_FOUND)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON deserialises");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("database exploded")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::insufficient_funds()
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "cost": 160 }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["code"], "insufficient_funds");
    assert_eq!(body["message"], "Insufficient currency");
    assert_eq!(body["details"], json!({ "cost": 160 }));
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_omit_the_header() {
    let (_, header, body) = render(&Error::user_not_found()).await;
    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[actix_web::test]
async fn json_payload_errors_become_invalid_requests() {
    let req = TestRequest::default().to_http_request();

    let error = json_error_handler(JsonPayloadError::ContentType, &req);
    let response = error.error_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "Invalid request body");
}

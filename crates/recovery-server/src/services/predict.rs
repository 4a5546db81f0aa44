//! Prediction service - payload decoding, validation and model dispatch.

use recovery_core::{Prediction, ValidationIssue};
use recovery_model::dispatch;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::AppError;
use crate::ServerState;

pub const NO_PAYLOAD: &str = "No JSON payload received!";

/// Decodes a request body into a JSON object.
///
/// An empty body and an empty JSON value (`null`, `false`, `0`, `""`, `[]`,
/// `{}`) are both treated as "no payload". Bodies that do not decode, or decode
/// to something other than an object, are internal errors carrying the decoder's
/// message.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest(NO_PAYLOAD.into()));
    }

    let value: Value = serde_json::from_slice(body).map_err(decode_error)?;

    if is_empty_value(&value) {
        return Err(AppError::BadRequest(NO_PAYLOAD.into()));
    }

    serde_json::from_value(value).map_err(decode_error)
}

fn decode_error(e: serde_json::Error) -> AppError {
    warn!("Undecodable payload: {}", e);
    AppError::Internal(e.to_string())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Validates the payload against the schema and dispatches it to the classifier.
pub fn run(state: &ServerState, payload: &Map<String, Value>) -> Result<Prediction, AppError> {
    let vector = state.schema.validate(payload).map_err(|issues| {
        let features: Vec<&str> = issues.iter().map(ValidationIssue::feature).collect();
        warn!(?features, "Rejected payload: {} validation issue(s)", issues.len());
        AppError::from(issues)
    })?;

    let prediction = dispatch(state.classifier.as_ref(), &vector).map_err(|e| {
        warn!("Classifier failed: {}", e);
        AppError::from(e)
    })?;

    info!(
        "Prediction {} (confidence_score {:.3})",
        prediction.label, prediction.confidence_score
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_request_message(result: Result<Map<String, Value>, AppError>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn empty_bodies_are_no_payload() {
        for body in ["", "   \n", "null", "{}", "[]", "false", "0", "\"\""] {
            assert_eq!(bad_request_message(parse_payload(body.as_bytes())), NO_PAYLOAD, "body {:?}", body);
        }
    }

    fn internal_message(result: Result<Map<String, Value>, AppError>) -> String {
        match result {
            Err(AppError::Internal(msg)) => msg,
            other => panic!("expected Internal, got {:?}", other),
        }
    }

    #[test]
    fn non_object_payload_is_internal() {
        for body in ["[1, 2]", "\"abc\"", "5", "true"] {
            let msg = internal_message(parse_payload(body.as_bytes()));
            assert!(msg.starts_with("invalid type:"), "body {:?}: {}", body, msg);
        }
    }

    #[test]
    fn malformed_json_is_internal_with_decoder_message() {
        let msg = internal_message(parse_payload(b"{\"priority\": "));
        assert_eq!(msg, "EOF while parsing a value at line 1 column 13");
    }

    #[test]
    fn object_payload_is_returned() {
        let map = parse_payload(br#"{"priority": 3}"#).unwrap();
        assert_eq!(map.get("priority"), Some(&Value::from(3)));
    }
}

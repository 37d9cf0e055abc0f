//! Validation of raw API payloads.
//!
//! Each step returns a tagged `PollError` instead of panicking so the poller
//! can report exactly which stage rejected the answer.

use serde_json::Value;

use super::{ApiResponse, Homework, HomeworkStatus};
use crate::error::PollError;

/// Check that the answer is a mapping with a `homeworks` list.
///
/// At least one of `homeworks` / `current_date` must be present, and
/// `homeworks` itself must be an array.
pub fn check_response(response: Value) -> Result<ApiResponse, PollError> {
    log::debug!("Checking API response");

    let mut map = match response {
        Value::Object(map) => map,
        other => {
            return Err(PollError::Schema(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            )))
        }
    };

    if !map.contains_key("homeworks") && !map.contains_key("current_date") {
        return Err(PollError::Schema(
            "neither 'homeworks' nor 'current_date' present".to_string(),
        ));
    }

    let homeworks = match map.remove("homeworks") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PollError::Schema(format!(
                "'homeworks' must be a list, got {}",
                json_type(&other)
            )))
        }
        None => return Err(PollError::Schema("'homeworks' is missing".to_string())),
    };

    let current_date = map.get("current_date").and_then(Value::as_i64);

    Ok(ApiResponse {
        homeworks,
        current_date,
    })
}

/// Most recent submission, if the listing is not empty.
pub fn latest_homework(response: &ApiResponse) -> Option<&Value> {
    response.homeworks.first()
}

/// Read name and status from one listing entry.
pub fn parse_status(homework: &Value) -> Result<Homework, PollError> {
    let Some(fields) = homework.as_object() else {
        return Err(PollError::Parse(format!(
            "homework entry must be an object, got {}",
            json_type(homework)
        )));
    };

    let name = match fields.get("homework_name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(PollError::Parse(format!(
                "'homework_name' must be a string, got {}",
                json_type(other)
            )))
        }
        None => return Err(PollError::Parse("no 'homework_name' key".to_string())),
    };

    let status = match fields.get("status") {
        Some(Value::String(status)) => status.parse::<HomeworkStatus>()?,
        Some(other) => {
            return Err(PollError::Parse(format!(
                "'status' must be a string, got {}",
                json_type(other)
            )))
        }
        None => return Err(PollError::Parse("no 'status' key".to_string())),
    };

    Ok(Homework { name, status })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_valid_response() {
        let resp = check_response(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        }))
        .unwrap();
        assert_eq!(resp.homeworks.len(), 1);
        assert_eq!(resp.current_date, Some(1000));
    }

    #[test]
    fn test_not_a_mapping() {
        for body in [json!([]), json!("text"), json!(null), json!(5)] {
            let err = check_response(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Schema);
        }
    }

    #[test]
    fn test_missing_both_keys() {
        let err = check_response(json!({"unexpected": 1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_only_current_date_is_schema_error() {
        let err = check_response(json!({"current_date": 1000})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_homeworks_wrong_type() {
        let err = check_response(json!({"homeworks": {"a": 1}, "current_date": 1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("must be a list"));
    }

    #[test]
    fn test_current_date_optional() {
        let resp = check_response(json!({"homeworks": []})).unwrap();
        assert!(resp.homeworks.is_empty());
        assert_eq!(resp.current_date, None);
        assert!(latest_homework(&resp).is_none());
    }

    #[test]
    fn test_latest_is_first_entry() {
        let resp = check_response(json!({
            "homeworks": [
                {"homework_name": "new", "status": "reviewing"},
                {"homework_name": "old", "status": "approved"}
            ]
        }))
        .unwrap();
        let hw = parse_status(latest_homework(&resp).unwrap()).unwrap();
        assert_eq!(hw.name, "new");
    }

    #[test]
    fn test_every_known_status_parses() {
        for status in HomeworkStatus::ALL {
            let hw = parse_status(&json!({"homework_name": "hw", "status": status.as_str()}))
                .unwrap();
            let message = hw.status_message();
            assert!(message.contains("\"hw\""));
            assert!(message.ends_with(status.verdict()));
        }
    }

    #[test]
    fn test_missing_fields_are_parse_errors() {
        for entry in [
            json!({"status": "approved"}),
            json!({"homework_name": "hw"}),
            json!({}),
            json!("hw"),
            json!({"homework_name": 3, "status": "approved"}),
            json!({"homework_name": "hw", "status": null}),
        ] {
            let err = parse_status(&entry).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "entry: {}", entry);
        }
    }

    #[test]
    fn test_unknown_status() {
        for status in ["pending", "APPROVED", ""] {
            let err = parse_status(&json!({"homework_name": "hw1", "status": status})).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownStatus);
        }
    }
}

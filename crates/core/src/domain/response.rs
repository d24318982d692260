use crate::domain::homework::AssignmentRecord;
use crate::error::{excerpt, BotError};
use serde_json::Value;

const HOMEWORKS_KEY: &str = "homeworks";

/// Checks the payload shape and returns the most recent assignment.
///
/// The API lists homeworks newest first, so the first element is taken as
/// the latest one.
pub fn check_response(raw: &Value) -> Result<AssignmentRecord, BotError> {
    let Value::Object(map) = raw else {
        return Err(BotError::TypeMismatch("Тип ответа не словарь".to_string()));
    };

    let homeworks = map.get(HOMEWORKS_KEY).ok_or_else(|| {
        BotError::TypeMismatch(format!(
            "Отсутствует \"{HOMEWORKS_KEY}\" в ответе: {}",
            excerpt(raw)
        ))
    })?;

    let Value::Array(items) = homeworks else {
        return Err(BotError::TypeMismatch("Тип ответа не список".to_string()));
    };

    let first = items.first().ok_or(BotError::EmptyResult)?;

    tracing::info!(homeworks_len = items.len(), "homework status update found");
    Ok(AssignmentRecord::new(first.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn returns_first_homework() {
        let raw = json!({
            "homeworks": [
                {"homework_name": "newest", "status": "reviewing"},
                {"homework_name": "older", "status": "approved"},
            ],
            "current_date": 1_700_000_000,
        });
        let record = check_response(&raw).unwrap();
        assert_eq!(record.raw()["homework_name"], "newest");
    }

    #[test]
    fn rejects_non_object_payload() {
        for raw in [json!([]), json!("homeworks"), json!(null)] {
            assert!(matches!(
                check_response(&raw),
                Err(BotError::TypeMismatch(_))
            ));
        }
    }

    #[test]
    fn rejects_missing_homeworks_key() {
        let raw = json!({"current_date": 1});
        match check_response(&raw) {
            Err(BotError::TypeMismatch(msg)) => assert!(msg.contains("homeworks")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_key_message_is_bounded_for_large_payloads() {
        let raw = json!({"detail": "x".repeat(50_000)});
        match check_response(&raw) {
            Err(BotError::TypeMismatch(msg)) => assert!(msg.chars().count() < 1_000),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_array_homeworks() {
        let raw = json!({"homeworks": {"homework_name": "hw1"}});
        assert!(matches!(
            check_response(&raw),
            Err(BotError::TypeMismatch(_))
        ));
    }

    #[test]
    fn empty_homeworks_is_its_own_error() {
        let raw = json!({"homeworks": []});
        assert!(matches!(check_response(&raw), Err(BotError::EmptyResult)));
    }
}

use serde_json::Value;
use thiserror::Error;

// Keeps diagnostics well under the 4096-character Telegram message limit.
const EXCERPT_MAX_CHARS: usize = 500;

/// Every way a poll cycle (or the pre-loop configuration check) can fail.
///
/// The `Display` text of each variant is what the user sees in the chat after
/// the `Сбой в работе программы: ` prefix, so it stays in Russian.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("{}", configuration_message(.missing, .invalid))]
    Configuration {
        missing: Vec<&'static str>,
        invalid: Vec<&'static str>,
    },

    #[error(
        "Ошибка при запросе к API: endpoint - {endpoint}, headers - {headers}, params - {params}: {detail}"
    )]
    Transport {
        endpoint: String,
        headers: String,
        params: String,
        detail: String,
    },

    #[error("Код ответа API {status}, ожидался 200")]
    UpstreamStatus { status: u16 },

    #[error("Ответ API не является JSON: {0}")]
    Decode(String),

    #[error("{0}")]
    TypeMismatch(String),

    #[error("Список работ пуст")]
    EmptyResult,

    #[error("Отсутствует ключ \"{field}\" в ответе API: {record}")]
    MissingField { field: &'static str, record: String },

    #[error("Неизвестный статус работы: {0}")]
    UnknownStatus(String),

    #[error("Ошибка при отправке сообщения")]
    Delivery,
}

impl BotError {
    /// Stable label used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::Configuration { .. } => "configuration",
            BotError::Transport { .. } => "transport",
            BotError::UpstreamStatus { .. } => "upstream_status",
            BotError::Decode(_) => "decode",
            BotError::TypeMismatch(_) => "type_mismatch",
            BotError::EmptyResult => "empty_result",
            BotError::MissingField { .. } => "missing_field",
            BotError::UnknownStatus(_) => "unknown_status",
            BotError::Delivery => "delivery",
        }
    }
}

fn configuration_message(missing: &[&'static str], invalid: &[&'static str]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!(
            "Отсутствуют обязательные переменные окружения: {}",
            missing.join(", ")
        ));
    }
    if !invalid.is_empty() {
        parts.push(format!(
            "Недопустимые значения переменных окружения: {}",
            invalid.join(", ")
        ));
    }
    parts.join("; ")
}

/// JSON text of `value`, cut to a bounded number of characters.
pub fn excerpt(value: &Value) -> String {
    let text = value.to_string();
    match text.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_display_matches_chat_text() {
        assert_eq!(BotError::EmptyResult.to_string(), "Список работ пуст");
    }

    #[test]
    fn upstream_status_mentions_code() {
        let err = BotError::UpstreamStatus { status: 503 };
        assert!(err.to_string().contains("503"));
        assert_eq!(err.kind(), "upstream_status");
    }

    #[test]
    fn configuration_lists_every_missing_variable() {
        let err = BotError::Configuration {
            missing: vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"],
            invalid: vec![],
        };
        let text = err.to_string();
        assert!(text.contains("PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"));
        assert!(!text.contains("Недопустимые"));
    }

    #[test]
    fn configuration_names_invalid_values() {
        let err = BotError::Configuration {
            missing: vec![],
            invalid: vec!["PRACTICUM_TOKEN"],
        };
        assert_eq!(
            err.to_string(),
            "Недопустимые значения переменных окружения: PRACTICUM_TOKEN"
        );
    }

    #[test]
    fn excerpt_keeps_short_json_intact() {
        let value = serde_json::json!({"homework_name": "hw1"});
        assert_eq!(excerpt(&value), value.to_string());
    }

    #[test]
    fn excerpt_bounds_long_json() {
        let value = serde_json::json!({"comment": "ж".repeat(10_000)});
        let text = excerpt(&value);
        assert_eq!(text.chars().count(), EXCERPT_MAX_CHARS + 1);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BotError>();
    }
}

use crate::error::{excerpt, BotError};
use serde_json::Value;
use std::collections::BTreeMap;

const FIELD_NAME: &str = "homework_name";
const FIELD_STATUS: &str = "status";

/// One entry of the `homeworks` array, kept untyped until formatting checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRecord(Value);

impl AssignmentRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    fn field(&self, key: &'static str) -> Result<&Value, BotError> {
        self.0.get(key).ok_or_else(|| BotError::MissingField {
            field: key,
            record: excerpt(&self.0),
        })
    }
}

/// Status code to verdict text. Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictMap(BTreeMap<String, String>);

impl VerdictMap {
    pub fn get(&self, status: &str) -> Option<&str> {
        self.0.get(status).map(String::as_str)
    }
}

impl Default for VerdictMap {
    fn default() -> Self {
        [
            ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VerdictMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Renders the chat message for the record's current review status.
pub fn format_status(record: &AssignmentRecord, verdicts: &VerdictMap) -> Result<String, BotError> {
    let name = record.field(FIELD_NAME)?;
    let status = record.field(FIELD_STATUS)?;

    let name = match name {
        Value::String(s) => s.clone(),
        other => excerpt(other),
    };
    let status = match status {
        Value::String(s) => s.as_str(),
        other => return Err(BotError::UnknownStatus(excerpt(other))),
    };

    let verdict = verdicts
        .get(status)
        .ok_or_else(|| BotError::UnknownStatus(status.to_string()))?;

    tracing::info!(homework = %name, status, "new homework status received");
    Ok(format!("Изменился статус проверки работы \"{name}\". {verdict}"))
}

pub mod api;
pub mod domain;
pub mod error;
pub mod notify;
pub mod poller;
pub mod time;

pub mod config {
    use crate::api::practicum::auth_header;
    use crate::error::BotError;
    use std::fmt;
    use std::time::Duration;

    pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
        "https://practicum.yandex.ru/api/user_api/homework_statuses/";
    pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
    const DEFAULT_RETRY_TIME_SECS: u64 = 600;
    // Thirty days.
    const DEFAULT_LOOKBACK_SECS: u64 = 30 * 24 * 3600;
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub practicum_token: Option<String>,
        pub telegram_token: Option<String>,
        pub telegram_chat_id: Option<String>,
        pub practicum_endpoint: String,
        pub telegram_api_url: String,
        pub retry_time: Duration,
        pub lookback: Duration,
        pub http_timeout: Duration,
        pub sentry_dsn: Option<String>,
    }

    /// Required values, all present and non-empty.
    #[derive(Clone)]
    pub struct Credentials {
        pub practicum_token: String,
        pub telegram_token: String,
        pub telegram_chat_id: String,
    }

    impl fmt::Debug for Credentials {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Credentials")
                .field("practicum_token", &"***")
                .field("telegram_token", &"***")
                .field("telegram_chat_id", &self.telegram_chat_id)
                .finish()
        }
    }

    impl Settings {
        pub fn from_env() -> Self {
            Self::from_vars(|key| std::env::var(key).ok())
        }

        pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
            let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
            let secs = |key: &str, default: u64| {
                Duration::from_secs(
                    get(key)
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(default),
                )
            };

            Self {
                practicum_token: get("PRACTICUM_TOKEN"),
                telegram_token: get("TELEGRAM_TOKEN"),
                telegram_chat_id: get("TELEGRAM_CHAT_ID"),
                practicum_endpoint: get("PRACTICUM_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
                telegram_api_url: get("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
                retry_time: secs("RETRY_TIME_SECS", DEFAULT_RETRY_TIME_SECS),
                lookback: secs("LOOKBACK_SECS", DEFAULT_LOOKBACK_SECS),
                http_timeout: secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
                sentry_dsn: get("SENTRY_DSN"),
            }
        }

        /// Pre-loop guard: every credential must be present before polling starts.
        pub fn check_tokens(&self) -> Result<Credentials, BotError> {
            let mut missing = Vec::new();
            let mut invalid = Vec::new();
            match &self.practicum_token {
                None => missing.push("PRACTICUM_TOKEN"),
                Some(token) if auth_header(token).is_err() => invalid.push("PRACTICUM_TOKEN"),
                Some(_) => {}
            }
            if self.telegram_token.is_none() {
                missing.push("TELEGRAM_TOKEN");
            }
            if self.telegram_chat_id.is_none() {
                missing.push("TELEGRAM_CHAT_ID");
            }

            if !missing.is_empty() || !invalid.is_empty() {
                return Err(BotError::Configuration { missing, invalid });
            }

            match (
                &self.practicum_token,
                &self.telegram_token,
                &self.telegram_chat_id,
            ) {
                (Some(practicum), Some(telegram), Some(chat_id)) => Ok(Credentials {
                    practicum_token: practicum.clone(),
                    telegram_token: telegram.clone(),
                    telegram_chat_id: chat_id.clone(),
                }),
                _ => Err(BotError::Configuration { missing, invalid }),
            }
        }
    }

}

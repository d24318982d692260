use crate::config::{Credentials, Settings};
use crate::error::BotError;
use crate::notify::Notifier;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn from_settings(settings: &Settings, credentials: &Credentials) -> anyhow::Result<Self> {
        Self::new(
            settings.telegram_api_url.clone(),
            credentials.telegram_token.clone(),
            credentials.telegram_chat_id.clone(),
            settings.http_timeout,
        )
    }

    pub fn new(
        api_url: String,
        bot_token: String,
        chat_id: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build telegram http client")?;

        Ok(Self {
            http,
            api_url,
            bot_token,
            chat_id,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    async fn send_message(&self, text: &str) -> Result<(), String> {
        let res = self
            .http
            .post(self.url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // The URL embeds the bot token.
            .map_err(|err| err.without_url().to_string())?;

        let status = res.status();
        let body = res
            .json::<BotApiResponse>()
            .await
            .map_err(|err| format!("status={status}, unreadable body: {}", err.without_url()))?;

        if !status.is_success() || !body.ok {
            return Err(format!(
                "status={status}, description={}",
                body.description.as_deref().unwrap_or("none")
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), BotError> {
        if message.trim().is_empty() {
            tracing::warn!("refusing to send an empty message");
            return Err(BotError::Delivery);
        }

        tracing::info!(text = message, "new message ready to send");
        if let Err(cause) = self.send_message(message).await {
            tracing::warn!(chat_id = %self.chat_id, %cause, "telegram sendMessage failed");
            return Err(BotError::Delivery);
        }
        tracing::info!(text = message, "new message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(uri: &str) -> TelegramNotifier {
        TelegramNotifier::new(
            uri.to_string(),
            "123:abc".to_string(),
            "42".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_message_to_configured_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "привет"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier(&server.uri()).notify("привет").await.unwrap();
    }

    #[tokio::test]
    async fn api_rejection_is_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = notifier(&server.uri()).notify("hi").await.unwrap_err();
        assert!(matches!(err, BotError::Delivery));
        assert_eq!(err.to_string(), "Ошибка при отправке сообщения");
    }

    #[tokio::test]
    async fn empty_message_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        assert!(notifier(&server.uri()).notify("  ").await.is_err());
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        crate::notify::LogNotifier.notify("anything").await.unwrap();
    }
}

use crate::api::HomeworkApi;
use crate::config::{Credentials, Settings};
use crate::error::BotError;
use crate::time::window::PollWindow;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// `Authorization: OAuth <token>` value sent with every status request.
pub fn auth_header(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("OAuth {token}"))
}

#[derive(Debug, Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn from_settings(settings: &Settings, credentials: &Credentials) -> anyhow::Result<Self> {
        Self::new(
            settings.practicum_endpoint.clone(),
            credentials.practicum_token.clone(),
            settings.http_timeout,
        )
    }

    pub fn new(endpoint: String, token: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build practicum http client")?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    fn headers(&self) -> Result<HeaderMap, BotError> {
        let mut headers = HeaderMap::new();
        let value = auth_header(&self.token).map_err(|err| {
            self.transport_error(None, format!("invalid authorization header: {err}"))
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    // The token never leaves the process in an error message.
    fn transport_error(&self, window: Option<PollWindow>, detail: String) -> BotError {
        BotError::Transport {
            endpoint: self.endpoint.clone(),
            headers: "Authorization: OAuth ***".to_string(),
            params: window
                .map(|w| format!("from_date={w}"))
                .unwrap_or_default(),
            detail,
        }
    }
}

#[async_trait::async_trait]
impl HomeworkApi for PracticumClient {
    async fn fetch(&self, window: PollWindow) -> Result<Value, BotError> {
        let headers = self.headers()?;

        let res = self
            .http
            .get(&self.endpoint)
            .headers(headers)
            .query(&[("from_date", window.from_date())])
            .send()
            .await
            .map_err(|err| self.transport_error(Some(window), err.to_string()))?;

        let status = res.status();
        if status != StatusCode::OK {
            tracing::warn!(%status, endpoint = %self.endpoint, "homework API returned non-200");
            return Err(BotError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let text = res
            .text()
            .await
            .map_err(|err| self.transport_error(Some(window), err.to_string()))?;
        serde_json::from_str::<Value>(&text).map_err(|err| BotError::Decode(err.to_string()))
    }
}

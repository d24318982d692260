//! Poll-validate-notify loop.
//!
//! Each cycle fetches the trailing window, validates the payload, formats the
//! latest homework status and sends it when it changed. Failures of any kind
//! become a diagnostic chat message, deduplicated against the last one sent.
//! Status messages and diagnostics are tracked in separate slots so one can
//! never suppress the other.

use crate::api::HomeworkApi;
use crate::config::Settings;
use crate::domain::homework::{format_status, VerdictMap};
use crate::domain::response::check_response;
use crate::error::BotError;
use crate::notify::Notifier;
use crate::time::window::PollWindow;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    StatusSent,
    /// Same status as the last delivered one; nothing sent.
    StatusUnchanged,
    /// The cycle failed and a new diagnostic was delivered.
    ErrorReported,
    /// The cycle failed with the same diagnostic as last time; nothing sent.
    ErrorSuppressed,
    /// A message was due but the chat channel refused it.
    DeliveryFailed,
}

pub struct Poller<A, N> {
    api: A,
    notifier: N,
    verdicts: VerdictMap,
    lookback: Duration,
    retry_time: Duration,
    last_verdict: Option<String>,
    last_error: Option<String>,
}

impl<A: HomeworkApi, N: Notifier> Poller<A, N> {
    pub fn new(
        api: A,
        notifier: N,
        verdicts: VerdictMap,
        lookback: Duration,
        retry_time: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            verdicts,
            lookback,
            retry_time,
            last_verdict: None,
            last_error: None,
        }
    }

    pub fn from_settings(api: A, notifier: N, settings: &Settings) -> Self {
        Self::new(
            api,
            notifier,
            VerdictMap::default(),
            settings.lookback,
            settings.retry_time,
        )
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    async fn check_status(&self, now: DateTime<Utc>) -> Result<String, BotError> {
        let window = PollWindow::ending_at(now, self.lookback);
        let raw = self.api.fetch(window).await?;
        let record = check_response(&raw)?;
        format_status(&record, &self.verdicts)
    }

    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        match self.check_status(now).await {
            Ok(message) => {
                self.last_error = None;
                if self.last_verdict.as_deref() == Some(message.as_str()) {
                    tracing::debug!("homework status unchanged");
                    return CycleOutcome::StatusUnchanged;
                }
                match self.notifier.notify(&message).await {
                    Ok(()) => {
                        self.last_verdict = Some(message);
                        CycleOutcome::StatusSent
                    }
                    Err(err) => {
                        tracing::error!(kind = err.kind(), error = %err, "status notification failed");
                        CycleOutcome::DeliveryFailed
                    }
                }
            }
            Err(err) => {
                tracing::error!(kind = err.kind(), error = %err, "homework status check failed");
                let diagnostic = format!("{FAILURE_PREFIX}: {err}");
                if self.last_error.as_deref() == Some(diagnostic.as_str()) {
                    return CycleOutcome::ErrorSuppressed;
                }
                match self.notifier.notify(&diagnostic).await {
                    Ok(()) => {
                        self.last_error = Some(diagnostic);
                        CycleOutcome::ErrorReported
                    }
                    Err(send_err) => {
                        tracing::error!(
                            kind = send_err.kind(),
                            error = %send_err,
                            "diagnostic notification failed"
                        );
                        CycleOutcome::DeliveryFailed
                    }
                }
            }
        }
    }

    /// Runs cycles forever, sleeping the fixed retry interval after each one.
    pub async fn run(&mut self) {
        tracing::info!(
            retry_time_secs = self.retry_time.as_secs(),
            lookback_secs = self.lookback.as_secs(),
            "homework poller started"
        );
        loop {
            let outcome = self.run_cycle(Utc::now()).await;
            tracing::info!(?outcome, "poll cycle finished");
            tokio::time::sleep(self.retry_time).await;
        }
    }
}

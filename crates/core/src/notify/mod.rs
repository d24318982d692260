pub mod telegram;

use crate::error::BotError;

pub use telegram::TelegramNotifier;

/// Delivery channel for chat messages.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), BotError>;
}

/// Logs messages instead of sending them (`--dry-run`).
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), BotError> {
        tracing::info!(text = message, dry_run = true, "message not sent");
        Ok(())
    }
}

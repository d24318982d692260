pub mod practicum;

use crate::error::BotError;
use crate::time::window::PollWindow;
use serde_json::Value;

pub use practicum::PracticumClient;

/// Source of raw homework-status payloads.
#[async_trait::async_trait]
pub trait HomeworkApi: Send + Sync {
    async fn fetch(&self, window: PollWindow) -> Result<Value, BotError>;
}

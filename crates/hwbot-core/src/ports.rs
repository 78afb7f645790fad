use async_trait::async_trait;

use crate::Result;

/// Port for the remote homework-review API.
///
/// Implementations return the raw JSON payload; shape checks live in
/// [`crate::homework`]. Fetch failures must map to the transport kinds
/// (`Error::Transport`, `Error::HttpStatus`, `Error::Decode`).
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    async fn homework_statuses(&self, token: &str, from_date: i64) -> Result<serde_json::Value>;
}

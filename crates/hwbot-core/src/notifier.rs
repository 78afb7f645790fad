use std::sync::Arc;

use crate::{domain::ChatId, messaging::port::MessagingPort, Result};

/// Sends plain-text notifications to the one configured chat.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
    chat_id: ChatId,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>, chat_id: ChatId) -> Self {
        Self { messenger, chat_id }
    }

    /// Send `text`, propagating transport errors.
    pub async fn try_send(&self, text: &str) -> Result<()> {
        let max = self.messenger.capabilities().max_message_len;
        let text = truncate_utf16(text, max);
        self.messenger.send_text(self.chat_id, &text).await?;
        Ok(())
    }

    /// Best-effort send: failures are logged, never returned.
    pub async fn notify(&self, text: &str) -> bool {
        match self.try_send(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    chat_id = self.chat_id.0,
                    error = %e,
                    "failed to send telegram message"
                );
                false
            }
        }
    }
}

/// Truncate to `max` UTF-16 code units, the unit Telegram measures length in.
fn truncate_utf16(text: &str, max: usize) -> String {
    if text.encode_utf16().count() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut used = 0usize;
    let kept: String = text
        .chars()
        .take_while(|c| {
            used += c.len_utf16();
            used <= budget
        })
        .collect();
    format!("{kept}...")
}

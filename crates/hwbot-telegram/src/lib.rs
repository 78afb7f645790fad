//! Telegram adapter (teloxide).
//!
//! This crate implements the `hwbot-core` MessagingPort over Telegram Bot API.

use async_trait::async_trait;

use teloxide::prelude::*;

use tokio::time::sleep;

use hwbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::port::{MessagingCapabilities, MessagingPort},
    Result,
};

/// Telegram's hard limit for a single text message.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    /// `@username` of the bot, if the token is valid and Telegram is reachable.
    pub async fn username(&self) -> Result<String> {
        let me = self.bot.get_me().await.map_err(Self::map_err)?;
        Ok(me.username().to_string())
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Notify(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: TELEGRAM_MESSAGE_LIMIT,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_ids_map_through() {
        assert_eq!(
            TelegramMessenger::tg_chat(ChatId(-100123)),
            teloxide::types::ChatId(-100123)
        );
    }

    #[test]
    fn capabilities_report_telegram_limit() {
        let m = TelegramMessenger::from_token("123:abc");
        assert_eq!(m.capabilities().max_message_len, 4096);
    }
}

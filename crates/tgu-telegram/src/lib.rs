//! Telegram adapter (teloxide).
//!
//! This crate implements the `tgu-core` ports over the Telegram Bot API and wires the
//! update dispatcher to the core flows.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, ApiError, RequestError};

use tokio::time::sleep;

pub mod convert;
pub mod fetch;
pub mod handlers;
pub mod router;

use tgu_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::port::MessagingPort,
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    pub(crate) fn map_err(e: RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(
        &self,
        mut op: impl FnMut() -> Fut,
    ) -> std::result::Result<T, RequestError>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    sleep(d).await;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(to.chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
                    .reply_to_message_id(Self::tg_msg_id(to.message_id))
                    .allow_sending_without_reply(true)
                    .disable_web_page_preview(true)
            })
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
        let res = self
            .with_retry(|| {
                self.bot
                    .edit_message_text(
                        Self::tg_chat(msg.chat_id),
                        Self::tg_msg_id(msg.message_id),
                        html.to_string(),
                    )
                    .parse_mode(ParseMode::Html)
            })
            .await;

        match res {
            Ok(_) => Ok(()),
            // Same text as before: nothing to change.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(Self::map_err(e)),
        }
    }
}

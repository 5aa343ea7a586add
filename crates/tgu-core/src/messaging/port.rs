use async_trait::async_trait;

use crate::{domain::MessageRef, Result};

/// Outbound messaging port.
///
/// All texts are Telegram HTML; callers escape user-provided fragments.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Reply to `to`, quoting it. Link previews are disabled.
    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef>;

    /// Replace the text of a message previously sent by the bot.
    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()>;
}

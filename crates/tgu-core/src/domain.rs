/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Who sent an inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    /// Public `@handle`, without the `@`.
    pub username: Option<String>,
    pub first_name: String,
}

impl Sender {
    /// The public handle, if the user has a non-empty one.
    pub fn handle(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// A downloadable Telegram attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_id: String,
    /// Size reported by Telegram, `0` when unknown.
    pub size: u64,
}

use crate::{
    domain::MessageRef, errors::Error, formatting::escape_html, messaging::port::MessagingPort,
    Result,
};

pub const REJECTED_TEXT: &str = "Unable to generate instant view link.";
pub const ATTACHMENT_MISSING_TEXT: &str =
    "⚠️ The attachment is no longer available. Please send it again.";

/// Why a flow step failed.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("could not prepare scratch directory: {0}")]
    Scratch(Error),

    #[error("download failed: {0}")]
    Download(Error),

    #[error("attachment is no longer available")]
    AttachmentMissing,

    #[error("upload failed: {0}")]
    Upload(Error),

    #[error("account creation failed: {0}")]
    Account(Error),

    #[error("content rejected: {0}")]
    Rejected(String),

    #[error("page creation failed: {0}")]
    Publish(Error),
}

impl FlowError {
    /// Text placed into the placeholder for this failure (Telegram HTML).
    pub fn user_message(&self) -> String {
        match self {
            FlowError::AttachmentMissing => ATTACHMENT_MISSING_TEXT.to_string(),
            FlowError::Rejected(_) => REJECTED_TEXT.to_string(),
            other => format!("<b>Error:</b>\n{}", escape_html(&other.to_string())),
        }
    }
}

/// Log `err` and replace the placeholder with its user-facing message.
pub async fn report_failure(
    messenger: &dyn MessagingPort,
    placeholder: MessageRef,
    err: &FlowError,
) -> Result<()> {
    let chat_id = placeholder.chat_id.0;
    match err {
        FlowError::AttachmentMissing => tracing::info!(chat_id, "{err}"),
        FlowError::Rejected(_) => tracing::warn!(chat_id, "{err}"),
        _ => tracing::error!(chat_id, "{err}"),
    }

    messenger.edit_html(placeholder, &err.user_message()).await
}

use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use teloxide::{net::Download, prelude::*, ApiError, RequestError};
use tokio::io::AsyncWriteExt;

use tgu_core::{
    domain::Attachment, errors::Error, ports::FileFetcher, progress::ProgressReporter, Result,
};

use crate::TelegramMessenger;

/// Streams Telegram files to disk, feeding the progress reporter per chunk.
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Unknown or expired file ids mean the attachment is gone.
fn map_get_file_err(e: RequestError, file_id: &str) -> Error {
    match e {
        RequestError::Api(ApiError::WrongFileId | ApiError::FileIdInvalid) => {
            Error::AttachmentMissing(file_id.to_string())
        }
        other => TelegramMessenger::map_err(other),
    }
}

#[async_trait]
impl FileFetcher for TelegramFetcher {
    async fn fetch(
        &self,
        attachment: &Attachment,
        dest: &Path,
        progress: &ProgressReporter,
    ) -> Result<()> {
        let file = self
            .bot
            .get_file(attachment.file_id.clone())
            .await
            .map_err(|e| map_get_file_err(e, &attachment.file_id))?;
        if file.path.is_empty() {
            return Err(Error::AttachmentMissing(attachment.file_id.clone()));
        }

        let total = attachment.size;
        let mut dst = tokio::fs::File::create(dest).await?;
        let mut stream = self.bot.download_file_stream(&file.path);

        let mut done = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| Error::External(format!("telegram download error: {e}")))?;
            dst.write_all(&chunk).await?;
            done += chunk.len() as u64;
            progress.report(done, total.max(done)).await;
        }
        dst.flush().await?;

        tracing::debug!(file_id = %attachment.file_id, bytes = done, "attachment downloaded");
        Ok(())
    }
}

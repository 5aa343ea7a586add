use crate::{
    domain::{Attachment, MessageRef, Sender},
    formatting::{escape_html, join_url},
    progress::ProgressReporter,
    scratch::ScratchDir,
    Result,
};

use super::{report_failure, FlowContext, FlowError, PROCESSING_TEXT};

const PHOTO_FILE_NAME: &str = "photo.jpg";

/// A private-chat photo to re-host.
#[derive(Clone, Debug)]
pub struct PhotoRequest {
    pub origin: MessageRef,
    pub sender: Sender,
    pub attachment: Attachment,
}

/// Download the photo, upload it to the image host and reply with its public URL.
pub async fn upload_photo(ctx: &FlowContext, req: PhotoRequest) -> Result<()> {
    let placeholder = ctx.messenger.reply_html(req.origin, PROCESSING_TEXT).await?;

    match stage_and_upload(ctx, &req, placeholder).await {
        Ok(url) => {
            tracing::info!(
                chat_id = req.origin.chat_id.0,
                user_id = req.sender.id.0,
                %url,
                "photo uploaded"
            );
            ctx.messenger.edit_html(placeholder, &escape_html(&url)).await
        }
        Err(e) => report_failure(ctx.messenger.as_ref(), placeholder, &e).await,
    }
}

async fn stage_and_upload(
    ctx: &FlowContext,
    req: &PhotoRequest,
    placeholder: MessageRef,
) -> std::result::Result<String, FlowError> {
    // Removed on every exit path when `scratch` drops.
    let scratch = ScratchDir::create(&ctx.cfg.temp_dir, req.sender.id).map_err(FlowError::Scratch)?;
    let dest = scratch.file(PHOTO_FILE_NAME);

    let progress = ProgressReporter::new(
        ctx.messenger.clone(),
        placeholder,
        ctx.cfg.progress_interval,
    );
    ctx.fetcher
        .fetch(&req.attachment, &dest, &progress)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                FlowError::AttachmentMissing
            } else {
                FlowError::Download(e)
            }
        })?;

    if !dest.is_file() {
        return Err(FlowError::AttachmentMissing);
    }

    let src = ctx.image_host.upload(&dest).await.map_err(|e| {
        if e.is_not_found() {
            FlowError::AttachmentMissing
        } else {
            FlowError::Upload(e)
        }
    })?;

    Ok(join_url(&ctx.cfg.telegraph_domain, &src))
}

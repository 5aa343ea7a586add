use crate::{
    article::Article,
    domain::{MessageRef, Sender},
    errors::Error,
    formatting::{escape_html, join_url},
    ports::PageDraft,
    render::TextEntity,
    Result,
};

use super::{report_failure, FlowContext, FlowError, PROCESSING_TEXT};

/// A private-chat text to publish as an article.
#[derive(Clone, Debug)]
pub struct ArticleRequest {
    pub origin: MessageRef,
    pub sender: Sender,
    /// Plain message text.
    pub text: String,
    /// Formatting of `text`, in UTF-16 units.
    pub entities: Vec<TextEntity>,
}

/// Turn the text into a published page and reply with its URL.
pub async fn publish_article(ctx: &FlowContext, req: ArticleRequest) -> Result<()> {
    let placeholder = ctx.messenger.reply_html(req.origin, PROCESSING_TEXT).await?;

    match publish(ctx, &req).await {
        Ok(url) => {
            tracing::info!(
                chat_id = req.origin.chat_id.0,
                user_id = req.sender.id.0,
                %url,
                "article published"
            );
            ctx.messenger.edit_html(placeholder, &escape_html(&url)).await
        }
        Err(e) => report_failure(ctx.messenger.as_ref(), placeholder, &e).await,
    }
}

async fn publish(
    ctx: &FlowContext,
    req: &ArticleRequest,
) -> std::result::Result<String, FlowError> {
    let article = Article::from_message(
        &req.text,
        &req.entities,
        &req.sender,
        &ctx.cfg.author_url_base,
    );
    if article.html.trim().is_empty() {
        return Err(FlowError::Rejected("content is empty".to_string()));
    }

    // A fresh account per article; tokens are never reused.
    let token = ctx
        .publisher
        .create_account(&ctx.cfg.telegraph_short_name)
        .await
        .map_err(FlowError::Account)?;

    let draft = PageDraft {
        title: article.title,
        html: article.html,
        author_name: article.author_name,
        author_url: article.author_url,
    };
    let page = ctx
        .publisher
        .create_page(&token, &draft)
        .await
        .map_err(|e| match e {
            Error::Rejected(reason) => FlowError::Rejected(reason),
            other => FlowError::Publish(other),
        })?;

    Ok(join_url(&ctx.cfg.telegraph_domain, &page.path))
}

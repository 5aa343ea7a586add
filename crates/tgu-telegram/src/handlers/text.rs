use teloxide::types::Message;

use tgu_core::{
    flows::{publish_article, ArticleRequest},
    Result,
};

use crate::{convert, router::AppState};

pub async fn handle_text(msg: &Message, state: &AppState) -> Result<()> {
    let Some(sender) = convert::sender(msg) else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    tracing::info!(
        chat_id = msg.chat.id.0,
        user_id = sender.id.0,
        chars = text.chars().count(),
        "text received"
    );

    publish_article(
        &state.flows,
        ArticleRequest {
            origin: convert::origin(msg),
            sender,
            text: text.to_string(),
            entities: convert::entities(msg),
        },
    )
    .await
}

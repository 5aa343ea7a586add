use teloxide::types::Message;

use tgu_core::{
    flows::{upload_photo, PhotoRequest},
    Result,
};

use crate::{convert, router::AppState};

pub async fn handle_photo(msg: &Message, state: &AppState) -> Result<()> {
    let (Some(sender), Some(attachment)) = (convert::sender(msg), convert::largest_photo(msg))
    else {
        return Ok(());
    };

    tracing::info!(
        chat_id = msg.chat.id.0,
        user_id = sender.id.0,
        file_id = %attachment.file_id,
        size = attachment.size,
        "photo received"
    );

    upload_photo(
        &state.flows,
        PhotoRequest {
            origin: convert::origin(msg),
            sender,
            attachment,
        },
    )
    .await
}

//! Telegram update handlers.
//!
//! Each handler converts the teloxide message into core types and runs one flow.
//! Flow errors are logged here; they never reach the dispatcher.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use tgu_core::dispatch::Route;

use crate::{convert, router::AppState};

mod photo;
mod start;
mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(route) = convert::route(&msg) else {
        tracing::debug!(chat_id = msg.chat.id.0, "ignoring message");
        return Ok(());
    };

    let result = match route {
        Route::Start => start::handle_start(&msg, &state).await,
        Route::Photo => photo::handle_photo(&msg, &state).await,
        Route::Text => text::handle_text(&msg, &state).await,
    };

    if let Err(e) = result {
        tracing::error!(chat_id = msg.chat.id.0, ?route, "handler failed: {e}");
    }
    Ok(())
}

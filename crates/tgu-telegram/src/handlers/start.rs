use teloxide::types::Message;

use tgu_core::{flows::send_welcome, Result};

use crate::{convert, router::AppState};

pub async fn handle_start(msg: &Message, state: &AppState) -> Result<()> {
    send_welcome(state.flows.messenger.as_ref(), convert::origin(msg)).await
}

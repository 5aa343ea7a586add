//! teloxide types → `tgu-core` types.

use teloxide::types::{Message, MessageEntity, MessageEntityKind};

use tgu_core::{
    dispatch::{classify, Route},
    domain::{Attachment, ChatId, MessageId, MessageRef, Sender, UserId},
    render::{EntityKind, TextEntity},
};

pub fn route(msg: &Message) -> Option<Route> {
    classify(msg.chat.is_private(), msg.text(), msg.photo().is_some())
}

pub fn origin(msg: &Message) -> MessageRef {
    MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    }
}

pub fn sender(msg: &Message) -> Option<Sender> {
    let user = msg.from()?;
    Some(Sender {
        id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    })
}

/// The largest size Telegram offers for the photo.
pub fn largest_photo(msg: &Message) -> Option<Attachment> {
    let best = msg
        .photo()?
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))?;
    Some(Attachment {
        file_id: best.file.id.clone(),
        size: u64::from(best.file.size),
    })
}

pub fn entities(msg: &Message) -> Vec<TextEntity> {
    msg.entities()
        .unwrap_or_default()
        .iter()
        .map(entity)
        .collect()
}

pub fn entity(e: &MessageEntity) -> TextEntity {
    let kind = match &e.kind {
        MessageEntityKind::Bold => EntityKind::Bold,
        MessageEntityKind::Italic => EntityKind::Italic,
        MessageEntityKind::Underline => EntityKind::Underline,
        MessageEntityKind::Strikethrough => EntityKind::Strikethrough,
        MessageEntityKind::Spoiler => EntityKind::Spoiler,
        MessageEntityKind::Code => EntityKind::Code,
        MessageEntityKind::Pre { .. } => EntityKind::Pre,
        MessageEntityKind::TextLink { url } => EntityKind::TextLink {
            url: url.to_string(),
        },
        MessageEntityKind::TextMention { user } => EntityKind::TextMention { user_id: user.id.0 },
        MessageEntityKind::CustomEmoji { custom_emoji_id } => EntityKind::CustomEmoji {
            id: custom_emoji_id.to_string(),
        },
        _ => EntityKind::Plain,
    };

    TextEntity {
        kind,
        offset: e.offset,
        length: e.length,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    fn private_text(text: &str, entities: serde_json::Value) -> Message {
        message(json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": {"id": 1001, "type": "private", "first_name": "Alice"},
            "from": {"id": 1001, "is_bot": false, "first_name": "Alice", "username": "alice"},
            "text": text,
            "entities": entities,
        }))
    }

    #[test]
    fn private_text_message_maps_to_core_types() {
        let msg = private_text("hello", json!([]));

        assert_eq!(route(&msg), Some(Route::Text));
        assert_eq!(
            origin(&msg),
            MessageRef {
                chat_id: ChatId(1001),
                message_id: MessageId(10),
            }
        );
        let s = sender(&msg).unwrap();
        assert_eq!(s.id, UserId(1001));
        assert_eq!(s.handle(), Some("alice"));
        assert_eq!(s.first_name, "Alice");
    }

    #[test]
    fn start_command_routes_to_start() {
        let msg = private_text(
            "/start",
            json!([{"type": "bot_command", "offset": 0, "length": 6}]),
        );
        assert_eq!(route(&msg), Some(Route::Start));
    }

    #[test]
    fn group_messages_are_ignored() {
        let msg = message(json!({
            "message_id": 3,
            "date": 1_700_000_000,
            "chat": {"id": -42, "type": "group", "title": "friends"},
            "from": {"id": 1001, "is_bot": false, "first_name": "Alice"},
            "text": "/start",
        }));
        assert_eq!(route(&msg), None);
    }

    #[test]
    fn photo_picks_largest_size() {
        let msg = message(json!({
            "message_id": 11,
            "date": 1_700_000_000,
            "chat": {"id": 1001, "type": "private", "first_name": "Alice"},
            "from": {"id": 1001, "is_bot": false, "first_name": "Alice"},
            "photo": [
                {
                    "file_id": "small", "file_unique_id": "s",
                    "width": 90, "height": 90, "file_size": 1200
                },
                {
                    "file_id": "large", "file_unique_id": "l",
                    "width": 1280, "height": 1280, "file_size": 240000
                }
            ],
        }));

        assert_eq!(route(&msg), Some(Route::Photo));
        assert_eq!(
            largest_photo(&msg),
            Some(Attachment {
                file_id: "large".to_string(),
                size: 240_000,
            })
        );
    }

    #[test]
    fn entities_map_to_render_kinds() {
        let msg = private_text(
            "bold link @bob",
            json!([
                {"type": "bold", "offset": 0, "length": 4},
                {"type": "text_link", "offset": 5, "length": 4, "url": "https://example.com/"},
                {"type": "mention", "offset": 10, "length": 4}
            ]),
        );

        let kinds: Vec<EntityKind> = entities(&msg).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Bold,
                EntityKind::TextLink {
                    url: "https://example.com/".to_string()
                },
                EntityKind::Plain,
            ]
        );
    }
}

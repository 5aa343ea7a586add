//! Classification of inbound private messages.

/// Which handler an inbound message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Start,
    Photo,
    Text,
}

/// Pick the handler for a message, or `None` to ignore it.
///
/// Only private chats are served; group and channel traffic is dropped silently.
pub fn classify(is_private: bool, text: Option<&str>, has_photo: bool) -> Option<Route> {
    if !is_private {
        return None;
    }

    if let Some(text) = text {
        if text.starts_with('/') {
            let (cmd, _) = parse_command(text);
            if matches!(cmd.as_str(), "start" | "help") {
                return Some(Route::Start);
            }
        }
    }

    if has_photo {
        return Some(Route::Photo);
    }

    text.map(|_| Route::Text)
}

/// Split `/cmd@botname args` into (`cmd`, `args`).
pub fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

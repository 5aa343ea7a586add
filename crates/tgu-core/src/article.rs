//! Text message → article transformation.
//!
//! Input is the plain message text with its formatting entities; output is the
//! plain-text title and the HTML body handed to the publishing service.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    domain::Sender,
    render::{render_html, TextEntity},
};

/// A resolved article, ready for page creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub html: String,
    pub author_name: String,
    pub author_url: Option<String>,
}

impl Article {
    /// Build the article for `sender` out of a message and its entities.
    ///
    /// The title is taken from the plain text; the title line is cut out of the
    /// text (and the entities) before the body is rendered.
    pub fn from_message(
        text: &str,
        entities: &[TextEntity],
        sender: &Sender,
        author_url_base: &str,
    ) -> Self {
        let (title, html) = match find_title_line(text) {
            Some(line) => {
                let (rest, rest_entities) = cut_line(text, entities, &line);
                (line.title, render_body(&rest, &rest_entities))
            }
            None => (sender.first_name.clone(), render_body(text, entities)),
        };

        Self {
            title,
            html,
            author_name: sender.first_name.clone(),
            author_url: author_url(author_url_base, sender.handle()),
        }
    }
}

/// A `Title: ...` line; `start..end` are byte offsets covering the line and its break.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleLine {
    pub title: String,
    pub start: usize,
    pub end: usize,
}

fn emoji_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<emoji id="\d+">|<tg-emoji emoji-id="\d+">"#).expect("valid regex")
    })
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `title`, then a colon or whitespace, then a non-blank title, anchored per line.
    RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*title(?::[ \t]*|[ \t]+)(\S.*?)[ \t\r]*$").expect("valid regex")
    })
}

/// Remove inline custom-emoji tags, keeping their fallback content.
pub fn strip_emoji_markup(text: &str) -> String {
    emoji_open_re()
        .replace_all(text, "")
        .replace("</emoji>", "")
        .replace("</tg-emoji>", "")
}

/// Find the first `Title: ...` line of the plain text.
pub fn find_title_line(text: &str) -> Option<TitleLine> {
    let caps = title_re().captures(text)?;
    let line = caps.get(0)?;
    let title = caps.get(1)?.as_str().trim().to_string();

    let mut end = line.end();
    if text[end..].starts_with("\r\n") {
        end += 2;
    } else if text[end..].starts_with('\n') {
        end += 1;
    }

    Some(TitleLine {
        title,
        start: line.start(),
        end,
    })
}

/// Remove `line` from `text`, shifting and clipping entities (UTF-16 units) to match.
fn cut_line(text: &str, entities: &[TextEntity], line: &TitleLine) -> (String, Vec<TextEntity>) {
    let cut_start = utf16_len(&text[..line.start]);
    let cut_len = utf16_len(&text[line.start..line.end]);
    let shift = |pos: usize| {
        if pos <= cut_start {
            pos
        } else if pos >= cut_start + cut_len {
            pos - cut_len
        } else {
            cut_start
        }
    };

    let entities = entities
        .iter()
        .filter_map(|e| {
            let from = shift(e.offset);
            let to = shift(e.offset + e.length);
            (to > from).then(|| TextEntity {
                kind: e.kind.clone(),
                offset: from,
                length: to - from,
            })
        })
        .collect();

    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..line.start]);
    rest.push_str(&text[line.end..]);
    (rest, entities)
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn render_body(text: &str, entities: &[TextEntity]) -> String {
    let html = strip_emoji_markup(&render_html(text, entities));
    line_breaks_to_html(html.trim())
}

/// Telegraph ignores raw newlines; every line break becomes `<br>`.
pub fn line_breaks_to_html(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Public profile link for a sender, only when a handle exists.
pub fn author_url(base: &str, handle: Option<&str>) -> Option<String> {
    let handle = handle?.trim().trim_start_matches('@');
    if handle.is_empty() {
        return None;
    }
    Some(format!("{}/{handle}", base.trim_end_matches('/')))
}

//! Message text + entities → HTML.
//!
//! Telegram describes formatting as entities over UTF-16 code unit ranges. The article
//! flow works on HTML, so the message is rendered first, custom emoji included.

use crate::formatting::escape_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Spoiler,
    Code,
    Pre,
    TextLink { url: String },
    TextMention { user_id: u64 },
    CustomEmoji { id: String },
    /// Entities without markup (mentions, hashtags, plain URLs, ...).
    Plain,
}

/// One formatting span; `offset`/`length` are in UTF-16 code units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntity {
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
}

impl EntityKind {
    fn open_tag(&self) -> Option<String> {
        Some(match self {
            EntityKind::Bold => "<b>".to_string(),
            EntityKind::Italic => "<i>".to_string(),
            EntityKind::Underline => "<u>".to_string(),
            EntityKind::Strikethrough => "<s>".to_string(),
            EntityKind::Spoiler => "<tg-spoiler>".to_string(),
            EntityKind::Code => "<code>".to_string(),
            EntityKind::Pre => "<pre>".to_string(),
            EntityKind::TextLink { url } => format!("<a href=\"{}\">", escape_html(url)),
            EntityKind::TextMention { user_id } => format!("<a href=\"tg://user?id={user_id}\">"),
            EntityKind::CustomEmoji { id } => format!("<emoji id=\"{}\">", escape_html(id)),
            EntityKind::Plain => return None,
        })
    }

    fn close_tag(&self) -> Option<&'static str> {
        Some(match self {
            EntityKind::Bold => "</b>",
            EntityKind::Italic => "</i>",
            EntityKind::Underline => "</u>",
            EntityKind::Strikethrough => "</s>",
            EntityKind::Spoiler => "</tg-spoiler>",
            EntityKind::Code => "</code>",
            EntityKind::Pre => "</pre>",
            EntityKind::TextLink { .. } | EntityKind::TextMention { .. } => "</a>",
            EntityKind::CustomEmoji { .. } => "</emoji>",
            EntityKind::Plain => return None,
        })
    }
}

struct Span<'a> {
    kind: &'a EntityKind,
    end: usize,
}

/// Render `text` with its entities as HTML. Plain text is escaped.
pub fn render_html(text: &str, entities: &[TextEntity]) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut sorted: Vec<&TextEntity> = entities
        .iter()
        .filter(|e| e.length > 0 && e.kind.open_tag().is_some())
        .collect();
    // Outer (longer) spans open first.
    sorted.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));

    let mut bounds: Vec<usize> = vec![0, units.len()];
    for e in &sorted {
        bounds.push(e.offset.min(units.len()));
        bounds.push((e.offset + e.length).min(units.len()));
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut out = String::with_capacity(text.len() + sorted.len() * 8);
    let mut stack: Vec<Span<'_>> = Vec::new();
    let mut next = sorted.iter().peekable();
    let mut pos = 0usize;

    for &b in &bounds {
        if b > pos {
            out.push_str(&escape_html(&String::from_utf16_lossy(&units[pos..b])));
            pos = b;
        }

        // Close spans ending here; spans still open beneath them are reopened.
        if stack.iter().any(|s| s.end <= pos) {
            let mut reopen = Vec::new();
            while let Some(top) = stack.pop() {
                out.push_str(top.kind.close_tag().unwrap_or_default());
                if top.end > pos {
                    reopen.push(top);
                }
                if !stack.iter().any(|s| s.end <= pos) {
                    break;
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&span.kind.open_tag().unwrap_or_default());
                stack.push(span);
            }
        }

        while let Some(e) = next.next_if(|e| e.offset.min(units.len()) == pos) {
            out.push_str(&e.kind.open_tag().unwrap_or_default());
            stack.push(Span {
                kind: &e.kind,
                end: (e.offset + e.length).min(units.len()),
            });
        }
    }

    // Anything left ends at the end of the text.
    while let Some(top) = stack.pop() {
        out.push_str(top.kind.close_tag().unwrap_or_default());
    }

    out
}

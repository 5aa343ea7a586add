//! Download progress rendered into the placeholder message.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use crate::{domain::MessageRef, messaging::port::MessagingPort};

const BAR_CELLS: u64 = 10;

/// Convert bytes to a human readable size (`1.5 MB`).
pub fn human_readable(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = size as f64;
    let mut unit = UNITS[0];
    for (i, u) in UNITS.iter().enumerate() {
        unit = u;
        if value < 1024.0 || i == UNITS.len() - 1 {
            break;
        }
        value /= 1024.0;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {unit}")
}

/// `[▪️▪️▫️…]\n<done> of <total>`; `None` when the total is unknown.
pub fn render_progress(done: u64, total: u64) -> Option<String> {
    if total == 0 {
        return None;
    }
    let done = done.min(total);
    let filled = done * BAR_CELLS / total;

    let mut bar = String::from("[");
    for _ in 0..filled {
        bar.push_str("▪️");
    }
    for _ in filled..BAR_CELLS {
        bar.push_str("▫️");
    }
    bar.push(']');

    Some(format!(
        "{bar}\n{} of {}",
        human_readable(done),
        human_readable(total)
    ))
}

#[derive(Debug, Default)]
struct ReporterState {
    last_edit: Option<Instant>,
    last_text: Option<String>,
}

/// Edits a placeholder with download progress, at most once per `interval`.
///
/// The final `done == total` update is always sent. Failures are logged and swallowed.
pub struct ProgressReporter {
    messenger: Arc<dyn MessagingPort>,
    target: MessageRef,
    interval: Duration,
    state: Mutex<ReporterState>,
}

impl ProgressReporter {
    pub fn new(messenger: Arc<dyn MessagingPort>, target: MessageRef, interval: Duration) -> Self {
        Self {
            messenger,
            target,
            interval,
            state: Mutex::new(ReporterState::default()),
        }
    }

    pub async fn report(&self, done: u64, total: u64) {
        let Some(text) = render_progress(done, total) else {
            return;
        };

        let mut state = self.state.lock().await;
        if state.last_text.as_deref() == Some(text.as_str()) {
            return;
        }
        let finished = done >= total;
        let due = state
            .last_edit
            .map(|t| t.elapsed() >= self.interval)
            .unwrap_or(true);
        if !finished && !due {
            return;
        }

        if let Err(e) = self.messenger.edit_html(self.target, &text).await {
            tracing::warn!(chat_id = self.target.chat_id.0, "progress edit failed: {e}");
        }
        state.last_edit = Some(Instant::now());
        state.last_text = Some(text);
    }
}

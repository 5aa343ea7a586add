/// Callbacks run by the bot runtime around the dispatcher.
pub trait LifecycleHooks: Send + Sync {
    fn on_start(&self, username: &str) {
        let _ = username;
    }

    fn on_stop(&self) {}
}

/// Default hooks: announce start and stop in the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingHooks;

impl LifecycleHooks for LoggingHooks {
    fn on_start(&self, username: &str) {
        tracing::info!("Bot started at @{username}");
    }

    fn on_stop(&self) {
        tracing::info!("Session stopped");
    }
}

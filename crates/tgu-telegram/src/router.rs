use std::{convert::Infallible, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tgu_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use tgu_core::{
    config::Config, flows::FlowContext, lifecycle::LifecycleHooks, messaging::port::MessagingPort,
    ports::{ImageHost, PagePublisher},
};

use crate::{fetch::TelegramFetcher, handlers, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub flows: FlowContext,
}

/// The publishing side of the bot: image hosting and page creation.
pub struct Publishing {
    pub image_host: Arc<dyn ImageHost>,
    pub publisher: Arc<dyn PagePublisher>,
}

/// No per-chat workers: one sender may have several flows in flight.
fn no_distribution(_: &Update) -> Option<Infallible> {
    None
}

pub async fn run_polling(
    cfg: Arc<Config>,
    publishing: Publishing,
    hooks: Arc<dyn LifecycleHooks>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let me = bot.get_me().await?;
    hooks.on_start(me.username());

    // Throttle outbound edits; progress updates are frequent. The adapter still retries
    // a single RetryAfter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let state = Arc::new(AppState {
        flows: FlowContext {
            cfg,
            messenger,
            fetcher: Arc::new(TelegramFetcher::new(bot.clone())),
            image_host: publishing.image_host,
            publisher: publishing.publisher,
        },
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .distribution_function(no_distribution)
        .default_handler(|upd| async move {
            tracing::debug!(update_id = upd.id, "unhandled update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    hooks.on_stop();
    Ok(())
}

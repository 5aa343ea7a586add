use std::sync::Arc;

use tgu_core::{config::Config, lifecycle::LoggingHooks};
use tgu_telegram::router::Publishing;
use tgu_telegraph::TelegraphClient;

mod health;

#[tokio::main]
async fn main() -> Result<(), tgu_core::Error> {
    tgu_core::logging::init("tgu")?;

    let cfg = Arc::new(Config::load()?);

    // The health server runs independently of the bot; a bind failure is logged only.
    let port = cfg.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(port).await {
            tracing::error!("health server failed: {e}");
        }
    });

    let telegraph = Arc::new(TelegraphClient::new(&cfg)?);
    let publishing = Publishing {
        image_host: telegraph.clone(),
        publisher: telegraph,
    };

    tgu_telegram::router::run_polling(cfg, publishing, Arc::new(LoggingHooks))
        .await
        .map_err(|e| tgu_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use hwbot_core::{clock::SystemClock, config::Config, poller::Poller, scheduler::FixedInterval};
use hwbot_practicum::PracticumClient;
use hwbot_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hwbot_core::logging::init("hwbot")?;

    let cfg = Arc::new(Config::load().context("failed to load configuration")?);
    tracing::debug!(?cfg, "configuration loaded");

    let api = Arc::new(
        PracticumClient::new(cfg.endpoint.clone(), cfg.request_timeout)
            .context("failed to build homework API client")?,
    );

    // Missing secrets are reported by every cycle; the bot itself is still built.
    let messenger = match cfg.credentials() {
        Ok(creds) => {
            let messenger = TelegramMessenger::from_token(creds.telegram_token);
            match messenger.username().await {
                Ok(name) => tracing::info!("bot started: @{name}"),
                Err(e) => tracing::warn!(error = %e, "bot started, but get_me failed"),
            }
            messenger
        }
        Err(e) => {
            tracing::error!(
                critical = true,
                error = %e,
                "bot started without usable credentials"
            );
            TelegramMessenger::from_token(cfg.telegram_token.clone().unwrap_or_default())
        }
    };
    let messenger = Arc::new(messenger);

    let mut poller = Poller::new(cfg.clone(), api, messenger, Arc::new(SystemClock));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            on_signal.cancel();
        }
    });

    FixedInterval::new(cfg.retry_interval)
        .run(&mut poller, &cancel)
        .await;

    Ok(())
}

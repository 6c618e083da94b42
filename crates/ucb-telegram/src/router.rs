use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use ucb_core::{
    app::App,
    config::Config,
    gate::build_gate,
    messaging::port::MessagingPort,
    notify::AdminNotifier,
    texts,
};

use crate::handlers;
use crate::TelegramMessenger;

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!("unit-economics calculator bot started: @{}", me.username());
    }
    info!(
        "web app: {}",
        cfg.web_app_url.as_deref().unwrap_or("not configured")
    );
    info!(
        "admin chat: {}",
        cfg.admin_chat_id.as_deref().unwrap_or("not configured")
    );
    info!(
        "channel: {}",
        cfg.channel_id.as_deref().unwrap_or("not configured")
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let gate = build_gate(cfg.channel_target(), cfg.gate_cache_ttl, messenger.clone());
    let notifier = AdminNotifier::new(cfg.admin_target(), messenger.clone());

    // One-time startup notice; a no-op when no admin is configured.
    notifier
        .notify(&texts::admin_startup(&texts::timestamp_now()))
        .await;

    let app = Arc::new(App::new(cfg, messenger, gate, notifier));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .build()
        .dispatch()
        .await;

    Ok(())
}

use std::sync::Arc;

use ucb_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), ucb_core::Error> {
    ucb_core::logging::init("ucb")?;

    let cfg = Arc::new(Config::load()?);

    ucb_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| ucb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}

use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use teamsync_api::{config::ApiConfig, ApiState};
use teamsync_core::clock::SystemClock;
use teamsync_db::open_stores;
use teamsync_discord_bot::{config::BotConfig, BotState, SerenityEmitter};
use teamsync_engine::{audit::ChannelAuditLog, SchedulingEngine, SyncContext};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let bot_config = BotConfig::from_env()?;
    let api_config = ApiConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(bot_config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting TeamSync with data in {}", bot_config.data_dir.display());

    let (config_store, event_store) = open_stores(&bot_config.data_dir).await?;
    let assigned = config_store.migrate_team_ids().await?;
    if assigned > 0 {
        info!("Assigned ids to {} legacy teams", assigned);
    }

    let config_store = Arc::new(config_store);
    let emitter = Arc::new(SerenityEmitter::from_token(&bot_config.token));
    let audit = Arc::new(ChannelAuditLog::new(
        config_store.clone(),
        emitter.clone(),
        bot_config.io_timeout,
    ));
    let sync = Arc::new(
        SyncContext::new(
            Arc::new(SystemClock),
            config_store,
            Arc::new(event_store),
            emitter,
            audit,
        )
        .with_io_timeout(bot_config.io_timeout),
    );

    let engine = Arc::new(
        SchedulingEngine::new(sync.clone(), bot_config.trigger)
            .with_tick_interval(bot_config.tick_interval),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine_task = engine.clone().spawn(shutdown_rx.clone());

    let api_state = Arc::new(ApiState {
        ctx: sync.clone(),
        status: engine.status(),
    });
    let api_task = tokio::spawn(teamsync_api::start_server(
        api_config,
        api_state,
        shutdown_rx.clone(),
    ));

    let bot_state = BotState {
        config: bot_config,
        sync,
        engine,
    };
    let mut bot_task = tokio::spawn(teamsync_discord_bot::start_bot(bot_state, shutdown_rx));

    // Stop on Ctrl+C, or when the gateway connection ends on its own.
    let finished = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown requested");
            None
        }
        result = &mut bot_task => Some(result?),
    };
    let _ = shutdown_tx.send(true);

    let bot_result = match finished {
        Some(result) => result,
        None => bot_task.await?,
    };
    match bot_result {
        Ok(_) => info!("Discord bot shut down gracefully"),
        Err(e) => error!("Discord bot error: {}", e),
    }
    if let Err(e) = api_task.await? {
        error!("Status API error: {}", e);
    }
    engine_task.await?;

    info!("TeamSync stopped");
    Ok(())
}

//! Discord front end: slash commands, RSVP buttons and the [`Emitter`]
//! the engine posts through.
//!
//! [`Emitter`]: teamsync_core::ports::Emitter

use eyre::Result;
use serenity::{prelude::GatewayIntents, Client};
use tokio::sync::watch;
use tracing::info;

pub mod commands;
pub mod components;
pub mod config;
pub mod emitter;
pub mod handlers;
pub mod options;

pub use emitter::SerenityEmitter;
pub use handlers::BotState;

/// Start the Discord bot and run it until `shutdown` flips to true or the
/// gateway connection ends.
pub async fn start_bot(state: BotState, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    info!("Starting Discord bot");

    let token = state.config.token.clone();
    let application_id = state.config.application_id;
    let handler = handlers::Handler::new(state);

    let mut client = Client::builder(&token, GatewayIntents::GUILDS)
        .application_id(application_id)
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }
        info!("Disconnecting from Discord");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}

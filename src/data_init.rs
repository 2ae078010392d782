use color_eyre::eyre::Result;
use dotenv::dotenv;
use std::path::PathBuf;
use teamsync_db::open_stores;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Prepare the data directory: create `servers.json` and `events/` when
/// missing and give every legacy team a stable id.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    info!("Initializing data directory {}", data_dir.display());
    let (config_store, _) = open_stores(&data_dir).await?;

    let assigned = config_store.migrate_team_ids().await?;
    info!("Data directory ready; {} legacy teams received ids", assigned);

    Ok(())
}

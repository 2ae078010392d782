use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Weekday;
use eyre::{eyre, Result, WrapErr};
use teamsync_engine::SyncTrigger;
use tracing::Level;

/// Configuration for the Discord bot and the engine it drives.
///
/// Everything comes from environment variables; `.env` files are loaded by
/// the binary before this is read.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Application ID for Discord bot (required)
    pub application_id: u64,
    /// Test guild ID for faster command registration during development
    pub test_guild_id: Option<u64>,
    /// Directory holding `servers.json`, `events/` and `update.txt`
    pub data_dir: PathBuf,
    /// How often the scheduling loop wakes up
    pub tick_interval: Duration,
    /// Upper bound for every store and Discord call
    pub io_timeout: Duration,
    /// Zone-local weekday and time of the weekly prompt
    pub trigger: SyncTrigger,
    pub log_level: Level,
    /// Only this user may broadcast `/update`; unset disables the command
    pub bot_owner_id: Option<u64>,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`BotConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = lookup("DISCORD_APPLICATION_ID")
            .ok_or_else(|| eyre!("DISCORD_APPLICATION_ID environment variable not set"))?
            .trim()
            .parse::<u64>()
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID must be a valid u64"))?;

        // Optional test guild ID for development
        let test_guild_id = lookup("DISCORD_TEST_GUILD_ID").and_then(|id| id.trim().parse().ok());

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let tick_interval = Duration::from_secs(parse_or(&lookup, "SYNC_TICK_SECONDS", 60)?);
        let io_timeout = Duration::from_secs(parse_or(&lookup, "IO_TIMEOUT_SECONDS", 10)?);
        if tick_interval.is_zero() || io_timeout.is_zero() {
            return Err(eyre!("SYNC_TICK_SECONDS and IO_TIMEOUT_SECONDS must be positive"));
        }

        let defaults = SyncTrigger::default();
        let weekday = match lookup("SYNC_WEEKDAY") {
            Some(day) => day
                .trim()
                .parse::<Weekday>()
                .map_err(|_| eyre!("SYNC_WEEKDAY must be a weekday name, got '{}'", day))?,
            None => defaults.weekday,
        };
        let trigger = SyncTrigger::new(
            weekday,
            parse_or(&lookup, "SYNC_HOUR", defaults.hour)?,
            parse_or(&lookup, "SYNC_MINUTE", defaults.minute)?,
        )?;

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .trim()
                .parse::<Level>()
                .map_err(|_| eyre!("Invalid LOG_LEVEL '{}'", level))?,
            None => Level::INFO,
        };

        let bot_owner_id = match lookup("BOT_OWNER_ID") {
            Some(id) => Some(id.trim().parse().wrap_err("BOT_OWNER_ID must be a valid u64")?),
            None => None,
        };

        Ok(Self {
            token,
            application_id,
            test_guild_id,
            data_dir,
            tick_interval,
            io_timeout,
            trigger,
            log_level,
            bot_owner_id,
        })
    }

    /// File whose contents `/update` broadcasts.
    pub fn update_file(&self) -> PathBuf {
        self.data_dir.join("update.txt")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| eyre!("{} has an invalid value '{}'", key, value)),
        None => Ok(default),
    }
}

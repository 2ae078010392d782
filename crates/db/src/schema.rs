use std::path::{Path, PathBuf};

use eyre::{eyre, Result, WrapErr};
use teamsync_core::errors::{SyncError, SyncResult};
use tokio::fs;
use tracing::info;

const SERVERS_FILE: &str = "servers.json";
const EVENTS_DIR: &str = "events";

/// Where the JSON documents live below the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn servers_file(&self) -> PathBuf {
        self.root.join(SERVERS_FILE)
    }

    pub fn events_dir(&self) -> PathBuf {
        self.root.join(EVENTS_DIR)
    }

    /// Event document of one community. Ids become file names, so only plain ids are accepted.
    pub fn events_file(&self, community_id: &str) -> SyncResult<PathBuf> {
        let valid = !community_id.is_empty()
            && community_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SyncError::Validation(format!(
                "invalid community id '{community_id}'"
            )));
        }
        Ok(self.events_dir().join(format!("{community_id}.json")))
    }
}

/// Create the data directory, the events directory and an empty configuration document.
pub async fn initialize_data_dir(layout: &DataLayout) -> Result<()> {
    fs::create_dir_all(layout.events_dir())
        .await
        .wrap_err_with(|| format!("cannot create {}", layout.events_dir().display()))?;

    let servers = layout.servers_file();
    match fs::metadata(&servers).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(eyre!("{} exists but is not a file", servers.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("Creating empty configuration document at {}", servers.display());
            fs::write(&servers, b"{}")
                .await
                .wrap_err_with(|| format!("cannot create {}", servers.display()))?;
        }
        Err(e) => return Err(e).wrap_err_with(|| format!("cannot inspect {}", servers.display())),
    }

    Ok(())
}

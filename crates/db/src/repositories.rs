//! JSON document stores.
//!
//! Every write goes to a sibling temp file that is flushed and then renamed over
//! the target, so readers see either the old document or the new one.

pub mod config;
pub mod events;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use teamsync_core::errors::{SyncError, SyncResult};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read a JSON document, treating a missing or blank file as the default value.
pub(crate) async fn read_document<T>(path: &Path) -> SyncResult<T>
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet, starting empty", path.display());
            return Ok(T::default());
        }
        Err(e) => {
            return Err(SyncError::Persistence(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    if contents.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&contents)
        .map_err(|e| SyncError::Persistence(format!("{} is not valid: {e}", path.display())))
}

/// Replace the document at `path` in one step.
pub(crate) async fn write_document<T>(path: &Path, value: &T) -> SyncResult<()>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| SyncError::PersistenceWriteFailure(format!("cannot encode document: {e}")))?;

    let tmp = temp_path(path);
    if let Err(e) = write_and_sync(&tmp, &bytes).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(SyncError::PersistenceWriteFailure(format!(
            "cannot write {}: {e}",
            tmp.display()
        )));
    }

    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(SyncError::PersistenceWriteFailure(format!(
            "cannot replace {}: {e}",
            path.display()
        )));
    }

    Ok(())
}

async fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.write_all(b"\n").await?;
    file.sync_all().await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

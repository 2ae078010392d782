use async_trait::async_trait;
use teamsync_core::errors::SyncResult;
use teamsync_core::models::community::ConfigDocument;
use teamsync_core::ports::ConfigStore;
use tracing::{debug, info, warn};

use super::{read_document, write_document};
use crate::schema::DataLayout;

/// The configuration document stored as `servers.json`.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    layout: DataLayout,
}

impl JsonConfigStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Give every stored team a stable id. Run once at startup, before anything
    /// else reads the document.
    pub async fn migrate_team_ids(&self) -> SyncResult<usize> {
        let mut document = self.load().await?;
        let assigned = document.assign_missing_team_ids();
        if assigned > 0 {
            self.save(&document).await?;
            info!("Assigned ids to {} stored teams", assigned);
        }
        Ok(assigned)
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> SyncResult<ConfigDocument> {
        let path = self.layout.servers_file();
        let document: ConfigDocument = read_document(&path).await?;

        let without_id = document
            .communities
            .values()
            .flat_map(|c| c.teams.iter())
            .filter(|t| t.team_id.is_nil())
            .count();
        if without_id > 0 {
            warn!("{} teams in {} have no id yet", without_id, path.display());
        }

        debug!("Loaded {} communities", document.communities.len());
        Ok(document)
    }

    async fn save(&self, document: &ConfigDocument) -> SyncResult<()> {
        write_document(&self.layout.servers_file(), document).await?;
        debug!("Saved {} communities", document.communities.len());
        Ok(())
    }
}

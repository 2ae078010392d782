use async_trait::async_trait;
use teamsync_core::errors::SyncResult;
use teamsync_core::models::event::EventBook;
use teamsync_core::ports::EventStore;

use super::{read_document, write_document};
use crate::schema::DataLayout;

/// One `events/<community_id>.json` document per community.
#[derive(Debug, Clone)]
pub struct JsonEventStore {
    layout: DataLayout,
}

impl JsonEventStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }
}

#[async_trait]
impl EventStore for JsonEventStore {
    async fn load_events(&self, community_id: &str) -> SyncResult<EventBook> {
        let path = self.layout.events_file(community_id)?;
        read_document(&path).await
    }

    async fn save_events(&self, community_id: &str, book: &EventBook) -> SyncResult<()> {
        let path = self.layout.events_file(community_id)?;
        write_document(&path, book).await?;
        tracing::debug!(
            "Saved {} events for community {}",
            book.events.len(),
            community_id
        );
        Ok(())
    }
}

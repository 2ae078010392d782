use async_trait::async_trait;
use mockall::mock;
use teamsync_core::errors::SyncResult;
use teamsync_core::models::community::ConfigDocument;
use teamsync_core::models::event::EventBook;
use teamsync_core::ports::{ConfigStore, EventStore};

// Mock stores for testing
mock! {
    pub ConfigRepo {}

    #[async_trait]
    impl ConfigStore for ConfigRepo {
        async fn load(&self) -> SyncResult<ConfigDocument>;
        async fn save(&self, document: &ConfigDocument) -> SyncResult<()>;
    }
}

mock! {
    pub EventRepo {}

    #[async_trait]
    impl EventStore for EventRepo {
        async fn load_events(&self, community_id: &str) -> SyncResult<EventBook>;
        async fn save_events(&self, community_id: &str, book: &EventBook) -> SyncResult<()>;
    }
}

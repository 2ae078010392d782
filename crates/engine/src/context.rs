use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::community::ConfigDocument;
use teamsync_core::models::event::EventBook;
use teamsync_core::models::{ChannelId, MessageId};
use teamsync_core::ports::{AuditLog, Clock, ConfigStore, Emitter, EventStore, OutgoingMessage};
use tokio::sync::{Mutex, MutexGuard};

pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the engine components share: the clock, the stores, the emitter,
/// the audit log and the lock that serializes every writer of the documents.
pub struct SyncContext {
    clock: Arc<dyn Clock>,
    config: Arc<dyn ConfigStore>,
    events: Arc<dyn EventStore>,
    emitter: Arc<dyn Emitter>,
    audit: Arc<dyn AuditLog>,
    documents: Mutex<()>,
    refreshes: Mutex<()>,
    io_timeout: Duration,
}

impl SyncContext {
    pub fn new(
        clock: Arc<dyn Clock>,
        config: Arc<dyn ConfigStore>,
        events: Arc<dyn EventStore>,
        emitter: Arc<dyn Emitter>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            clock,
            config,
            events,
            emitter,
            audit,
            documents: Mutex::new(()),
            refreshes: Mutex::new(()),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    /// Hold for the whole load, mutate and save sequence.
    pub async fn lock_documents(&self) -> MutexGuard<'_, ()> {
        self.documents.lock().await
    }

    /// Serializes re-renders of posted tallies. Each holder reloads the ledger,
    /// so the edit that lands last shows the newest stored state.
    pub async fn lock_refreshes(&self) -> MutexGuard<'_, ()> {
        self.refreshes.lock().await
    }

    pub async fn audit(&self, community_id: &str, text: &str) {
        self.audit.append(community_id, text).await;
    }

    /// Run one I/O call, failing with `Timeout` when it does not finish in time.
    pub async fn bounded<T, F>(&self, action: &str, call: F) -> SyncResult<T>
    where
        F: Future<Output = SyncResult<T>>,
    {
        match tokio::time::timeout(self.io_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Timed out after {:?} while {}", self.io_timeout, action);
                Err(SyncError::Timeout(action.to_string()))
            }
        }
    }

    pub async fn load_config(&self) -> SyncResult<ConfigDocument> {
        self.bounded("loading the configuration document", self.config.load())
            .await
    }

    pub async fn save_config(&self, document: &ConfigDocument) -> SyncResult<()> {
        self.bounded("saving the configuration document", self.config.save(document))
            .await
    }

    pub async fn load_events(&self, community_id: &str) -> SyncResult<EventBook> {
        self.bounded(
            "loading the event document",
            self.events.load_events(community_id),
        )
        .await
    }

    pub async fn save_events(&self, community_id: &str, book: &EventBook) -> SyncResult<()> {
        self.bounded(
            "saving the event document",
            self.events.save_events(community_id, book),
        )
        .await
    }

    pub async fn channel_available(&self, channel_id: ChannelId) -> SyncResult<bool> {
        self.bounded(
            "looking up a channel",
            self.emitter.channel_available(channel_id),
        )
        .await
    }

    pub async fn send(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> SyncResult<MessageId> {
        self.bounded(
            "sending a message",
            self.emitter.send_message(channel_id, message),
        )
        .await
    }

    pub async fn edit(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: &OutgoingMessage,
    ) -> SyncResult<()> {
        self.bounded(
            "editing a message",
            self.emitter.edit_message(channel_id, message_id, message),
        )
        .await
    }
}

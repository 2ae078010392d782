//! Collaborators the engine talks to. Implementations live in the db and
//! discord-bot crates; tests substitute in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SyncResult;
use crate::models::community::ConfigDocument;
use crate::models::event::EventBook;
use crate::models::{ChannelId, MessageId, RoleId};

/// Loads and saves the whole configuration document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// A missing document loads as empty.
    async fn load(&self) -> SyncResult<ConfigDocument>;

    /// Replaces the stored document. Either the new document is stored in full or
    /// the previous one is left untouched.
    async fn save(&self, document: &ConfigDocument) -> SyncResult<()>;
}

/// Loads and saves the per-community event documents.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn load_events(&self, community_id: &str) -> SyncResult<EventBook>;

    async fn save_events(&self, community_id: &str, book: &EventBook) -> SyncResult<()>;
}

/// Content handed to the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: String,
    /// Attach the attend / maybe / can't / withdraw buttons.
    pub rsvp_controls: bool,
}

impl OutgoingMessage {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            rsvp_controls: false,
        }
    }

    pub fn with_rsvp(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            rsvp_controls: true,
        }
    }
}

/// Posts and edits messages in community channels.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Whether the channel exists and can be posted to.
    async fn channel_available(&self, channel_id: ChannelId) -> SyncResult<bool>;

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> SyncResult<MessageId>;

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: &OutgoingMessage,
    ) -> SyncResult<()>;
}

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Appends administrative log lines for a community. Never fails.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, community_id: &str, text: &str);
}

/// The user behind a request, with the role ids the interaction layer resolved for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: u64,
    pub display_name: String,
    pub role_ids: Vec<RoleId>,
    /// Holds the community-wide administrator permission.
    #[serde(default)]
    pub server_admin: bool,
}

impl Actor {
    pub fn describe(&self) -> String {
        format!("{} ({})", self.display_name, self.user_id)
    }
}

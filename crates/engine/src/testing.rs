//! In-memory collaborators for tests of the engine and of the crates built on it.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::{ChannelId, MessageId};
use teamsync_core::ports::{AuditLog, Emitter, OutgoingMessage};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub message: OutgoingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub message: OutgoingMessage,
}

/// Emitter that records everything and hands out increasing message ids.
///
/// Channels can be marked missing (lookups say unavailable) or failing (sends are rejected).
#[derive(Debug)]
pub struct RecordingEmitter {
    next_id: AtomicU64,
    missing: Mutex<HashSet<ChannelId>>,
    failing: Mutex<HashSet<ChannelId>>,
    sent: Mutex<Vec<SentMessage>>,
    edited: Mutex<Vec<EditedMessage>>,
    edit_delays: Mutex<VecDeque<Duration>>,
}

impl Default for RecordingEmitter {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            missing: Mutex::default(),
            failing: Mutex::default(),
            sent: Mutex::default(),
            edited: Mutex::default(),
            edit_delays: Mutex::default(),
        }
    }
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_missing(&self, channel_id: ChannelId) {
        lock(&self.missing).insert(channel_id);
    }

    pub fn mark_failing(&self, channel_id: ChannelId) {
        lock(&self.failing).insert(channel_id);
    }

    /// The next edit call waits `delay` before it lands.
    pub fn delay_next_edit(&self, delay: Duration) {
        lock(&self.edit_delays).push_back(delay);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn sent_to(&self, channel_id: ChannelId) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .collect()
    }

    pub fn edited(&self) -> Vec<EditedMessage> {
        lock(&self.edited).clone()
    }
}

#[async_trait]
impl Emitter for RecordingEmitter {
    async fn channel_available(&self, channel_id: ChannelId) -> SyncResult<bool> {
        Ok(!lock(&self.missing).contains(&channel_id))
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> SyncResult<MessageId> {
        if lock(&self.missing).contains(&channel_id) {
            return Err(SyncError::ChannelUnavailable(channel_id));
        }
        if lock(&self.failing).contains(&channel_id) {
            return Err(SyncError::Delivery(format!("channel {channel_id} rejected the message")));
        }

        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.sent).push(SentMessage {
            channel_id,
            message_id,
            message: message.clone(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: &OutgoingMessage,
    ) -> SyncResult<()> {
        let delay = lock(&self.edit_delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if lock(&self.failing).contains(&channel_id) {
            return Err(SyncError::Delivery(format!("channel {channel_id} rejected the edit")));
        }
        lock(&self.edited).push(EditedMessage {
            channel_id,
            message_id,
            message: message.clone(),
        });
        Ok(())
    }
}

/// Audit log that keeps `(community, line)` pairs.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    lines: Mutex<Vec<(String, String)>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(String, String)> {
        lock(&self.lines).clone()
    }

    pub fn lines_for(&self, community_id: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(id, _)| id == community_id)
            .map(|(_, line)| line)
            .collect()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, community_id: &str, text: &str) {
        lock(&self.lines).push((community_id.to_string(), text.to_string()));
    }
}

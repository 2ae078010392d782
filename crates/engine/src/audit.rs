use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teamsync_core::ports::{AuditLog, ConfigStore, Emitter, OutgoingMessage};
use tracing::{info, warn};

/// Writes every audit line to the log and, when the community configured one,
/// posts it to the bot log channel.
pub struct ChannelAuditLog {
    config: Arc<dyn ConfigStore>,
    emitter: Arc<dyn Emitter>,
    timeout: Duration,
}

impl ChannelAuditLog {
    pub fn new(config: Arc<dyn ConfigStore>, emitter: Arc<dyn Emitter>, timeout: Duration) -> Self {
        Self {
            config,
            emitter,
            timeout,
        }
    }

    async fn post(&self, community_id: &str, text: &str) -> Result<(), String> {
        let document = tokio::time::timeout(self.timeout, self.config.load())
            .await
            .map_err(|_| "timed out loading configuration".to_string())?
            .map_err(|e| e.to_string())?;

        let Some(channel_id) = document
            .community(community_id)
            .and_then(|c| c.bot_logs_channel)
        else {
            return Ok(());
        };

        let message = OutgoingMessage::plain(text);
        tokio::time::timeout(self.timeout, self.emitter.send_message(channel_id, &message))
            .await
            .map_err(|_| format!("timed out posting to channel {channel_id}"))?
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for ChannelAuditLog {
    async fn append(&self, community_id: &str, text: &str) {
        info!(community = %community_id, "audit: {}", text);
        if let Err(e) = self.post(community_id, text).await {
            warn!(
                "Could not post audit line to bot log channel of community {}: {}",
                community_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingEmitter;
    use teamsync_core::errors::SyncResult;
    use teamsync_core::models::community::{CommunityConfig, ConfigDocument};

    struct FixedConfig(ConfigDocument);

    #[async_trait]
    impl ConfigStore for FixedConfig {
        async fn load(&self) -> SyncResult<ConfigDocument> {
            Ok(self.0.clone())
        }

        async fn save(&self, _document: &ConfigDocument) -> SyncResult<()> {
            Ok(())
        }
    }

    fn config_with_log_channel(channel: Option<u64>) -> Arc<dyn ConfigStore> {
        let mut document = ConfigDocument::default();
        document.communities.insert(
            "1".to_string(),
            CommunityConfig {
                setup_complete: true,
                bot_logs_channel: channel,
                ..CommunityConfig::default()
            },
        );
        Arc::new(FixedConfig(document))
    }

    #[tokio::test]
    async fn posts_to_configured_log_channel() {
        let emitter = Arc::new(RecordingEmitter::new());
        let audit = ChannelAuditLog::new(
            config_with_log_channel(Some(77)),
            emitter.clone(),
            Duration::from_secs(1),
        );

        audit.append("1", "Team 'Owls' created").await;

        let sent = emitter.sent_to(77);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message.content, "Team 'Owls' created");
    }

    #[tokio::test]
    async fn missing_or_broken_channel_is_swallowed() {
        let emitter = Arc::new(RecordingEmitter::new());
        emitter.mark_failing(78);

        let unset = ChannelAuditLog::new(config_with_log_channel(None), emitter.clone(), Duration::from_secs(1));
        unset.append("1", "nothing to post to").await;

        let broken = ChannelAuditLog::new(
            config_with_log_channel(Some(78)),
            emitter.clone(),
            Duration::from_secs(1),
        );
        broken.append("1", "rejected").await;

        assert!(emitter.sent().is_empty());
    }
}

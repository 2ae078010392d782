use thiserror::Error;

use crate::models::{ChannelId, MessageId};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("Unknown timezone label: {0}")]
    InvalidTimezoneLabel(String),

    #[error("Channel {0} is unavailable")]
    ChannelUnavailable(ChannelId),

    #[error("Unauthorized actor: {0}")]
    UnauthorizedActor(String),

    #[error("Unknown event: {0}")]
    UnknownEventId(MessageId),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bot has not been set up in community {0}")]
    SetupIncomplete(String),

    #[error("Setup has already been completed for community {0}")]
    AlreadySetUp(String),

    #[error("Failed to read stored state: {0}")]
    Persistence(String),

    #[error("Failed to write stored state: {0}")]
    PersistenceWriteFailure(String),

    #[error("Message delivery failed: {0}")]
    Delivery(String),

    #[error("Timed out while {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
    /// Whether the error only concerns one team or request and must not stop a batch.
    pub fn is_isolated(&self) -> bool {
        matches!(
            self,
            SyncError::ChannelUnavailable(_)
                | SyncError::Delivery(_)
                | SyncError::InvalidTimezoneLabel(_)
                | SyncError::Timeout(_)
        )
    }
}

impl From<eyre::Report> for SyncError {
    fn from(report: eyre::Report) -> Self {
        SyncError::Internal(report.into())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{snowflake, ChannelId, MessageId, ParticipantId, RoleId};

/// All scheduling events of one community, keyed by the id of the message that carries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventBook {
    pub events: BTreeMap<MessageId, EventRecord>,
}

/// One emitted prompt and its RSVP ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub event_name: String,

    #[serde(default)]
    pub team_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,

    #[serde(default, with = "snowflake::optional", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,

    /// Role mentioned at the top of the posted message; kept so refreshes do not drop it.
    #[serde(default, with = "snowflake::optional", skip_serializing_if = "Option::is_none")]
    pub ping_role: Option<RoleId>,

    /// Scheduled time in the team's zone. Absent on records created lazily by an RSVP.
    #[serde(default)]
    pub datetime: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub attend: Vec<ParticipantId>,

    #[serde(default)]
    pub maybe: Vec<ParticipantId>,

    #[serde(default)]
    pub cant: Vec<ParticipantId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    pub fn new(
        event_name: impl Into<String>,
        team_name: impl Into<String>,
        team_id: Option<Uuid>,
        channel_id: ChannelId,
        datetime: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            team_name: team_name.into(),
            team_id,
            channel_id: Some(channel_id),
            datetime: Some(datetime),
            ..Self::default()
        }
    }

    pub fn with_ping(mut self, role: RoleId) -> Self {
        self.ping_role = Some(role);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpChoice {
    Attending,
    Tentative,
    Declined,
}

impl RsvpChoice {
    pub const ALL: [RsvpChoice; 3] = [
        RsvpChoice::Attending,
        RsvpChoice::Tentative,
        RsvpChoice::Declined,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RsvpChoice::Attending => "Can Attend",
            RsvpChoice::Tentative => "May be able to",
            RsvpChoice::Declined => "Can't Attend",
        }
    }

    pub fn emoji(self) -> char {
        match self {
            RsvpChoice::Attending => '✅',
            RsvpChoice::Tentative => '🤔',
            RsvpChoice::Declined => '❌',
        }
    }
}

/// Snapshot of an event's responses, each list in answer order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub attending: Vec<ParticipantId>,
    pub tentative: Vec<ParticipantId>,
    pub declined: Vec<ParticipantId>,
}

impl Tally {
    pub fn for_choice(&self, choice: RsvpChoice) -> &[ParticipantId] {
        match choice {
            RsvpChoice::Attending => &self.attending,
            RsvpChoice::Tentative => &self.tentative,
            RsvpChoice::Declined => &self.declined,
        }
    }

    pub fn total(&self) -> usize {
        self.attending.len() + self.tentative.len() + self.declined.len()
    }
}

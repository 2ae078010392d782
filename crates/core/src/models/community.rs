use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{snowflake, ChannelId, CommunityId, RoleId};

/// The whole persisted configuration: one entry per community, keyed by community id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    pub communities: BTreeMap<CommunityId, CommunityConfig>,
}

impl ConfigDocument {
    pub fn community(&self, community_id: &str) -> Option<&CommunityConfig> {
        self.communities.get(community_id)
    }

    pub fn community_mut(&mut self, community_id: &str) -> Option<&mut CommunityConfig> {
        self.communities.get_mut(community_id)
    }

    /// Assigns a stable id to every team that was stored without one.
    ///
    /// Returns how many teams were given a new id.
    pub fn assign_missing_team_ids(&mut self) -> usize {
        let mut assigned = 0;
        for community in self.communities.values_mut() {
            for team in community.teams.iter_mut().filter(|t| t.team_id.is_nil()) {
                team.team_id = Uuid::new_v4();
                assigned += 1;
            }
        }
        assigned
    }
}

/// Per-community settings. Keys this version does not know about are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredCommunity", into = "StoredCommunity")]
pub struct CommunityConfig {
    pub setup_complete: bool,
    pub teams: Vec<Team>,
    pub admin_roles: Vec<RoleId>,
    pub bot_channels: Vec<ChannelId>,
    pub update_logs_channel: Option<ChannelId>,
    pub bot_logs_channel: Option<ChannelId>,
    /// Stored team entries that could not be read, written back untouched.
    pub unreadable_teams: Vec<Value>,
    pub extra: Map<String, Value>,
}

/// On-disk shape of a community. Teams are read one by one so a broken entry
/// only takes itself out.
#[derive(Serialize, Deserialize)]
struct StoredCommunity {
    #[serde(rename = "SetupComplete", default)]
    setup_complete: bool,

    #[serde(default)]
    teams: Vec<Value>,

    #[serde(default, with = "snowflake::string_list")]
    admin_roles: Vec<RoleId>,

    #[serde(default, with = "snowflake::string_list")]
    bot_channels: Vec<ChannelId>,

    #[serde(default, with = "snowflake::optional", skip_serializing_if = "Option::is_none")]
    update_logs_channel: Option<ChannelId>,

    #[serde(default, with = "snowflake::optional", skip_serializing_if = "Option::is_none")]
    bot_logs_channel: Option<ChannelId>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredCommunity> for CommunityConfig {
    fn from(stored: StoredCommunity) -> Self {
        let mut teams = Vec::with_capacity(stored.teams.len());
        let mut unreadable_teams = Vec::new();
        for entry in stored.teams {
            match Team::deserialize(&entry) {
                Ok(team) => teams.push(team),
                Err(e) => {
                    debug!(
                        "Skipping unreadable team '{}': {}",
                        UnreadableTeam(&entry).name(),
                        e
                    );
                    unreadable_teams.push(entry);
                }
            }
        }

        Self {
            setup_complete: stored.setup_complete,
            teams,
            admin_roles: stored.admin_roles,
            bot_channels: stored.bot_channels,
            update_logs_channel: stored.update_logs_channel,
            bot_logs_channel: stored.bot_logs_channel,
            unreadable_teams,
            extra: stored.extra,
        }
    }
}

impl From<CommunityConfig> for StoredCommunity {
    fn from(community: CommunityConfig) -> Self {
        let mut teams: Vec<Value> = community
            .teams
            .iter()
            .filter_map(|team| serde_json::to_value(team).ok())
            .collect();
        teams.extend(community.unreadable_teams);

        Self {
            setup_complete: community.setup_complete,
            teams,
            admin_roles: community.admin_roles,
            bot_channels: community.bot_channels,
            update_logs_channel: community.update_logs_channel,
            bot_logs_channel: community.bot_logs_channel,
            extra: community.extra,
        }
    }
}

/// Best-effort view of a stored team entry that failed to parse.
pub struct UnreadableTeam<'a>(pub &'a Value);

impl UnreadableTeam<'_> {
    pub fn name(&self) -> &str {
        self.0
            .get("team_name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
    }

    pub fn team_id(&self) -> Uuid {
        self.0
            .get("team_id")
            .and_then(Value::as_str)
            .and_then(|id| Uuid::parse_str(id).ok())
            .unwrap_or_default()
    }

    pub fn timezone(&self) -> &str {
        self.0
            .get("timezone")
            .and_then(Value::as_str)
            .unwrap_or("UTC")
    }
}

impl CommunityConfig {
    /// A freshly joined community that has not run setup yet.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn team(&self, team_id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    pub fn team_mut(&mut self, team_id: Uuid) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.team_id == team_id)
    }

    /// Case-insensitive lookup; names are unique per community.
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        let wanted = name.trim().to_lowercase();
        self.teams
            .iter()
            .find(|t| t.team_name.trim().to_lowercase() == wanted)
    }

    pub fn is_admin(&self, role_ids: &[RoleId]) -> bool {
        role_ids.iter().any(|role| self.admin_roles.contains(role))
    }

    pub fn is_bot_channel(&self, channel_id: ChannelId) -> bool {
        self.bot_channels.contains(&channel_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub team_id: Uuid,

    pub team_name: String,

    #[serde(default)]
    pub game: String,

    #[serde(with = "snowflake::number")]
    pub team_cap_role: RoleId,

    #[serde(with = "snowflake::number")]
    pub team_role: RoleId,

    #[serde(with = "snowflake::number")]
    pub team_schedule_channel: ChannelId,

    /// Human label such as "New York"; resolved when used, never at write time.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Zone-local date of the last scheduling prompt that was actually delivered.
    #[serde(default)]
    pub last_synced: Option<NaiveDate>,

    #[serde(default)]
    pub created_at: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Input for creating a team through the admin flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTeam {
    pub team_name: String,
    pub game: String,
    pub team_cap_role: RoleId,
    /// Members role; the captain role doubles as the team role when absent.
    pub team_role: Option<RoleId>,
    pub team_schedule_channel: ChannelId,
    pub timezone: String,
}

impl Team {
    pub fn from_request(request: NewTeam, created_at: String) -> Self {
        Self {
            team_id: Uuid::new_v4(),
            team_name: request.team_name.trim().to_string(),
            game: request.game,
            team_cap_role: request.team_cap_role,
            team_role: request.team_role.unwrap_or(request.team_cap_role),
            team_schedule_channel: request.team_schedule_channel,
            timezone: request.timezone,
            last_synced: None,
            created_at,
            extra: Map::new(),
        }
    }
}

/// One field-level edit from the admin modify flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TeamChange {
    Name(String),
    Game(String),
    CaptainRole(RoleId),
    TeamRole(RoleId),
    ScheduleChannel(ChannelId),
    Timezone(String),
}

impl TeamChange {
    pub fn apply(self, team: &mut Team) {
        match self {
            TeamChange::Name(name) => team.team_name = name.trim().to_string(),
            TeamChange::Game(game) => team.game = game,
            TeamChange::CaptainRole(role) => team.team_cap_role = role,
            TeamChange::TeamRole(role) => team.team_role = role,
            TeamChange::ScheduleChannel(channel) => team.team_schedule_channel = channel,
            TeamChange::Timezone(label) => team.timezone = label,
        }
    }
}

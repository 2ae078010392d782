//! Community administration: setup, bot channels, admin roles, log channels and teams.
//!
//! Every mutation loads the configuration document, checks setup and the actor's
//! roles, applies the change and saves, all while holding the document lock. An
//! audit line is written once the lock is released.

use chrono::SecondsFormat;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::community::{CommunityConfig, ConfigDocument, NewTeam, Team, TeamChange};
use teamsync_core::models::{ChannelId, RoleId};
use teamsync_core::ports::Actor;
use teamsync_core::render::role_mention;
use teamsync_core::timezone::{self, MAX_SUGGESTIONS};
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::SyncContext;

/// Which of the two log channels a setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogChannel {
    /// Receives update announcements.
    Updates,
    /// Receives audit lines.
    BotLogs,
}

impl LogChannel {
    fn label(self) -> &'static str {
        match self {
            LogChannel::Updates => "update log channel",
            LogChannel::BotLogs => "bot log channel",
        }
    }
}

fn setup_community<'a>(
    document: &'a ConfigDocument,
    community_id: &str,
) -> SyncResult<&'a CommunityConfig> {
    document
        .community(community_id)
        .filter(|c| c.setup_complete)
        .ok_or_else(|| SyncError::SetupIncomplete(community_id.to_string()))
}

fn authorize(community: &CommunityConfig, actor: &Actor) -> SyncResult<()> {
    if community.is_admin(&actor.role_ids) {
        Ok(())
    } else {
        Err(SyncError::UnauthorizedActor(actor.describe()))
    }
}

/// Load, check, mutate and save one community under the document lock.
async fn mutate_community<T, F>(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    apply: F,
) -> SyncResult<T>
where
    F: FnOnce(&mut CommunityConfig) -> SyncResult<T>,
{
    let _guard = ctx.lock_documents().await;
    let mut document = ctx.load_config().await?;
    authorize(setup_community(&document, community_id)?, actor)?;

    let community = document
        .community_mut(community_id)
        .ok_or_else(|| SyncError::SetupIncomplete(community_id.to_string()))?;
    let value = apply(community)?;

    ctx.save_config(&document).await?;
    Ok(value)
}

/// Verify that `actor` may administer the community without changing anything.
pub async fn require_admin(ctx: &SyncContext, community_id: &str, actor: &Actor) -> SyncResult<()> {
    let document = ctx.load_config().await?;
    authorize(setup_community(&document, community_id)?, actor)
}

/// Record a newly joined community. Returns whether it was unknown.
pub async fn register_community(ctx: &SyncContext, community_id: &str) -> SyncResult<bool> {
    let _guard = ctx.lock_documents().await;
    let mut document = ctx.load_config().await?;
    if document.community(community_id).is_some() {
        debug!("Community {} already registered", community_id);
        return Ok(false);
    }

    document
        .communities
        .insert(community_id.to_string(), CommunityConfig::pending());
    ctx.save_config(&document).await?;
    info!("Registered community {}", community_id);
    Ok(true)
}

/// First-time setup: one bot channel and one admin role. Needs the server-wide
/// administrator permission rather than an admin role.
pub async fn complete_setup(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    bot_channel: ChannelId,
    admin_role: RoleId,
) -> SyncResult<()> {
    if !actor.server_admin {
        return Err(SyncError::UnauthorizedActor(actor.describe()));
    }

    {
        let _guard = ctx.lock_documents().await;
        let mut document = ctx.load_config().await?;
        let community = document
            .communities
            .entry(community_id.to_string())
            .or_insert_with(CommunityConfig::pending);
        if community.setup_complete {
            return Err(SyncError::AlreadySetUp(community_id.to_string()));
        }

        community.setup_complete = true;
        if !community.bot_channels.contains(&bot_channel) {
            community.bot_channels.push(bot_channel);
        }
        if !community.admin_roles.contains(&admin_role) {
            community.admin_roles.push(admin_role);
        }
        ctx.save_config(&document).await?;
    }

    ctx.audit(
        community_id,
        &format!(
            "{} completed setup: bot channel <#{}>, admin role {}",
            actor.describe(),
            bot_channel,
            role_mention(admin_role)
        ),
    )
    .await;
    Ok(())
}

pub async fn add_bot_channel(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    channel_id: ChannelId,
) -> SyncResult<()> {
    mutate_community(ctx, community_id, actor, |community| {
        if community.bot_channels.contains(&channel_id) {
            return Err(SyncError::Validation(format!(
                "channel {channel_id} is already a bot channel"
            )));
        }
        community.bot_channels.push(channel_id);
        Ok(())
    })
    .await?;

    ctx.audit(
        community_id,
        &format!("{} added bot channel <#{}>", actor.describe(), channel_id),
    )
    .await;
    Ok(())
}

pub async fn remove_bot_channel(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    channel_id: ChannelId,
) -> SyncResult<()> {
    mutate_community(ctx, community_id, actor, |community| {
        let before = community.bot_channels.len();
        community.bot_channels.retain(|c| *c != channel_id);
        if community.bot_channels.len() == before {
            return Err(SyncError::NotFound(format!(
                "channel {channel_id} is not a bot channel"
            )));
        }
        Ok(())
    })
    .await?;

    ctx.audit(
        community_id,
        &format!("{} removed bot channel <#{}>", actor.describe(), channel_id),
    )
    .await;
    Ok(())
}

pub async fn list_bot_channels(ctx: &SyncContext, community_id: &str) -> SyncResult<Vec<ChannelId>> {
    let document = ctx.load_config().await?;
    Ok(setup_community(&document, community_id)?.bot_channels.clone())
}

pub async fn add_admin_role(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    role_id: RoleId,
) -> SyncResult<()> {
    mutate_community(ctx, community_id, actor, |community| {
        if community.admin_roles.contains(&role_id) {
            return Err(SyncError::Validation(format!(
                "role {role_id} is already an admin role"
            )));
        }
        community.admin_roles.push(role_id);
        Ok(())
    })
    .await?;

    ctx.audit(
        community_id,
        &format!("{} added admin role {}", actor.describe(), role_mention(role_id)),
    )
    .await;
    Ok(())
}

pub async fn remove_admin_role(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    role_id: RoleId,
) -> SyncResult<()> {
    mutate_community(ctx, community_id, actor, |community| {
        let before = community.admin_roles.len();
        community.admin_roles.retain(|r| *r != role_id);
        if community.admin_roles.len() == before {
            return Err(SyncError::NotFound(format!(
                "role {role_id} is not an admin role"
            )));
        }
        Ok(())
    })
    .await?;

    ctx.audit(
        community_id,
        &format!("{} removed admin role {}", actor.describe(), role_mention(role_id)),
    )
    .await;
    Ok(())
}

pub async fn list_admin_roles(ctx: &SyncContext, community_id: &str) -> SyncResult<Vec<RoleId>> {
    let document = ctx.load_config().await?;
    Ok(setup_community(&document, community_id)?.admin_roles.clone())
}

/// Set or clear (`None`) one of the log channels.
pub async fn set_log_channel(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    which: LogChannel,
    channel_id: Option<ChannelId>,
) -> SyncResult<()> {
    mutate_community(ctx, community_id, actor, |community| {
        match which {
            LogChannel::Updates => community.update_logs_channel = channel_id,
            LogChannel::BotLogs => community.bot_logs_channel = channel_id,
        }
        Ok(())
    })
    .await?;

    let line = match channel_id {
        Some(channel_id) => format!(
            "{} set the {} to <#{}>",
            actor.describe(),
            which.label(),
            channel_id
        ),
        None => format!("{} cleared the {}", actor.describe(), which.label()),
    };
    ctx.audit(community_id, &line).await;
    Ok(())
}

fn ensure_unique_name(community: &CommunityConfig, name: &str, except: Option<Uuid>) -> SyncResult<()> {
    if name.trim().is_empty() {
        return Err(SyncError::Validation("team name must not be empty".to_string()));
    }
    match community.team_by_name(name) {
        Some(existing) if Some(existing.team_id) != except => Err(SyncError::Validation(format!(
            "a team named '{}' already exists",
            existing.team_name
        ))),
        _ => Ok(()),
    }
}

fn ensure_known_timezone(label: &str) -> SyncResult<()> {
    timezone::try_resolve(label).map(|_| ())
}

pub async fn create_team(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    request: NewTeam,
) -> SyncResult<Team> {
    ensure_known_timezone(&request.timezone)?;
    let created_at = ctx.now().to_rfc3339_opts(SecondsFormat::Micros, false);

    let team = mutate_community(ctx, community_id, actor, |community| {
        ensure_unique_name(community, &request.team_name, None)?;
        let team = Team::from_request(request, created_at);
        community.teams.push(team.clone());
        Ok(team)
    })
    .await?;

    ctx.audit(
        community_id,
        &format!(
            "{} created team '{}' ({}) for '{}' in <#{}>, timezone {}",
            actor.describe(),
            team.team_name,
            team.team_id,
            team.game,
            team.team_schedule_channel,
            team.timezone
        ),
    )
    .await;
    Ok(team)
}

/// Teams in display order.
pub async fn list_teams(ctx: &SyncContext, community_id: &str) -> SyncResult<Vec<Team>> {
    let document = ctx.load_config().await?;
    Ok(setup_community(&document, community_id)?.teams.clone())
}

pub async fn find_team_by_name(
    ctx: &SyncContext,
    community_id: &str,
    name: &str,
) -> SyncResult<Team> {
    let document = ctx.load_config().await?;
    setup_community(&document, community_id)?
        .team_by_name(name)
        .cloned()
        .ok_or_else(|| SyncError::NotFound(format!("team '{}'", name.trim())))
}

/// Apply one field-level change to the team with `team_id`.
pub async fn modify_team(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    team_id: Uuid,
    change: TeamChange,
) -> SyncResult<Team> {
    if let TeamChange::Timezone(label) = &change {
        ensure_known_timezone(label)?;
    }
    let description = format!("{change:?}");

    let team = mutate_community(ctx, community_id, actor, |community| {
        if let TeamChange::Name(name) = &change {
            ensure_unique_name(community, name, Some(team_id))?;
        }
        let team = community
            .team_mut(team_id)
            .ok_or_else(|| SyncError::NotFound(format!("team {team_id}")))?;
        change.apply(team);
        Ok(team.clone())
    })
    .await?;

    ctx.audit(
        community_id,
        &format!(
            "{} modified team '{}' ({}): {}",
            actor.describe(),
            team.team_name,
            team.team_id,
            description
        ),
    )
    .await;
    Ok(team)
}

/// Remove the team with `team_id` and return it.
pub async fn delete_team(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    team_id: Uuid,
) -> SyncResult<Team> {
    let team = mutate_community(ctx, community_id, actor, |community| {
        let position = community
            .teams
            .iter()
            .position(|t| t.team_id == team_id)
            .ok_or_else(|| SyncError::NotFound(format!("team {team_id}")))?;
        Ok(community.teams.remove(position))
    })
    .await?;

    ctx.audit(
        community_id,
        &format!(
            "{} deleted team '{}' ({})",
            actor.describe(),
            team.team_name,
            team.team_id
        ),
    )
    .await;
    Ok(team)
}

/// Team names containing `fragment`, case-insensitively, for autocomplete.
pub async fn team_names_matching(
    ctx: &SyncContext,
    community_id: &str,
    fragment: &str,
) -> SyncResult<Vec<String>> {
    let document = ctx.load_config().await?;
    let wanted = fragment.trim().to_lowercase();
    Ok(document
        .community(community_id)
        .map(|community| {
            community
                .teams
                .iter()
                .filter(|t| t.team_name.to_lowercase().contains(&wanted))
                .map(|t| t.team_name.clone())
                .take(MAX_SUGGESTIONS)
                .collect()
        })
        .unwrap_or_default())
}

/// Whether commands may be used in `channel_id`. Unknown communities have no bot channels.
pub async fn is_bot_channel(
    ctx: &SyncContext,
    community_id: &str,
    channel_id: ChannelId,
) -> SyncResult<bool> {
    let document = ctx.load_config().await?;
    Ok(document
        .community(community_id)
        .is_some_and(|c| c.is_bot_channel(channel_id)))
}

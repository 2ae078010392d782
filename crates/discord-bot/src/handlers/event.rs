use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_engine::{broadcast, planner};
use tracing::info;

use super::{BotState, Invocation};
use crate::options;

/// Handle the /event command
pub async fn handle_event(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let opts = &invocation.options;
    let team_name = options::string(opts, "team_name")?;
    let date = options::string(opts, "date")?;
    let time = u32::try_from(options::integer(opts, "time")?).map_err(|_| {
        SyncError::Validation("time must be hhmm (24hr)".to_string())
    })?;
    let event_name = options::string(opts, "event_name")?;

    let created = planner::create_event(
        &state.sync,
        &invocation.community_id,
        &invocation.actor,
        &team_name,
        &date,
        time,
        &event_name,
    )
    .await?;

    Ok(format!("Event created in <#{}>", created.channel_id))
}

/// Handle the /sync_now command
pub async fn handle_sync_now(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    teamsync_engine::admin::require_admin(&state.sync, &invocation.community_id, &invocation.actor)
        .await?;

    let report = state.engine.sync_now().await?;
    Ok(format!(
        "Sync finished: {} prompt(s) posted, {} failed, {} team(s) already synced today.",
        report.emitted.len(),
        report.failed.len(),
        report.already_synced
    ))
}

/// Handle the /update command. Only the configured bot owner may broadcast.
pub async fn handle_update(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    if state.config.bot_owner_id != Some(invocation.actor.user_id) {
        return Err(SyncError::UnauthorizedActor(invocation.actor.describe()));
    }

    let path = state.config.update_file();
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => return Ok("No update.txt file found in the data folder.".to_string()),
    };

    let reached = broadcast::broadcast_update(&state.sync, &text).await?;
    info!("Update broadcast by {} reached {} channels", invocation.actor.describe(), reached);
    Ok(format!("Update sent to {reached} update logs channel(s)."))
}

pub fn help_text() -> String {
    [
        "**Setup** (server administrator): /setup",
        "**Admin**: /addbotchannel, /removebotchannel, /listbotchannels, /addadminrole, /removeadminrole, /listadminroles, /setlogchannel",
        "**Teams** (admin): /create_team, /list_teams, /modify_team, /delete_team, /sync_now",
        "**Events**: /event creates a one-off event with RSVP buttons",
        "Weekly scheduling prompts are posted automatically in each team's schedule channel.",
    ]
    .join("\n")
}

use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::community::{NewTeam, Team, TeamChange};
use teamsync_core::render::role_mention;
use teamsync_engine::admin;

use super::{BotState, Invocation};
use crate::options::{self, parse_snowflake};

/// Turn the `/modify_team` field and raw value into a typed change.
pub fn parse_team_change(field: &str, value: &str) -> SyncResult<TeamChange> {
    let id = || {
        parse_snowflake(value)
            .ok_or_else(|| SyncError::Validation(format!("'{value}' is not a role or channel")))
    };
    let text = value.trim().to_string();

    match field {
        "name" => Ok(TeamChange::Name(text)),
        "game" => Ok(TeamChange::Game(text)),
        "captain_role" => Ok(TeamChange::CaptainRole(id()?)),
        "team_role" => Ok(TeamChange::TeamRole(id()?)),
        "schedule_channel" => Ok(TeamChange::ScheduleChannel(id()?)),
        "timezone" => Ok(TeamChange::Timezone(text)),
        other => Err(SyncError::Validation(format!("unknown team field '{other}'"))),
    }
}

fn describe(team: &Team) -> String {
    format!(
        "**{}** ({}) | Captain: {} | Channel: <#{}> | Timezone: {}",
        team.team_name,
        team.game,
        role_mention(team.team_cap_role),
        team.team_schedule_channel,
        team.timezone
    )
}

/// Handle the /create_team command
pub async fn handle_create_team(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let opts = &invocation.options;
    let request = NewTeam {
        team_name: options::string(opts, "team_name")?,
        game: options::string(opts, "game")?,
        team_cap_role: options::snowflake(opts, "team_cap_role")?,
        team_role: options::optional_snowflake(opts, "team_role")?,
        team_schedule_channel: options::snowflake(opts, "team_schedule_channel")?,
        timezone: options::string(opts, "timezone")?,
    };

    let team =
        admin::create_team(&state.sync, &invocation.community_id, &invocation.actor, request).await?;

    Ok(format!(
        "Team '{}' created for '{}'. Captain: {}, Channel: <#{}>, Timezone: {}",
        team.team_name,
        team.game,
        role_mention(team.team_cap_role),
        team.team_schedule_channel,
        team.timezone
    ))
}

/// Handle the /list_teams command
pub async fn handle_list_teams(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    admin::require_admin(&state.sync, &invocation.community_id, &invocation.actor).await?;
    let teams = admin::list_teams(&state.sync, &invocation.community_id).await?;
    if teams.is_empty() {
        return Ok("No teams.".to_string());
    }

    let lines: Vec<String> = teams.iter().map(describe).collect();
    Ok(lines.join("\n"))
}

/// Handle the /delete_team command
pub async fn handle_delete_team(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let name = options::string(&invocation.options, "team")?;
    let team = admin::find_team_by_name(&state.sync, &invocation.community_id, &name).await?;

    let removed = admin::delete_team(
        &state.sync,
        &invocation.community_id,
        &invocation.actor,
        team.team_id,
    )
    .await?;

    Ok(format!("Team '{}' deleted.", removed.team_name))
}

/// Handle the /modify_team command
pub async fn handle_modify_team(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let name = options::string(&invocation.options, "team")?;
    let field = options::string(&invocation.options, "field")?;
    let value = options::string(&invocation.options, "value")?;
    let change = parse_team_change(&field, &value)?;

    let team = admin::find_team_by_name(&state.sync, &invocation.community_id, &name).await?;
    let updated = admin::modify_team(
        &state.sync,
        &invocation.community_id,
        &invocation.actor,
        team.team_id,
        change,
    )
    .await?;

    Ok(format!("Team updated: {}", describe(&updated)))
}

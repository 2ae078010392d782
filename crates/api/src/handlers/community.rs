use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use teamsync_core::{
    errors::SyncError,
    models::{community::Team, MessageId, ParticipantId},
    timezone,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Snowflakes are rendered as strings so JavaScript clients keep full precision.
fn ids(list: &[ParticipantId]) -> Vec<String> {
    list.iter().map(|id| id.to_string()).collect()
}

#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub team_id: Uuid,
    pub team_name: String,
    pub game: String,
    /// Label as configured.
    pub timezone: String,
    /// Zone the label resolves to; UTC for unknown labels.
    pub zone: String,
    pub team_schedule_channel: String,
    pub last_synced: Option<NaiveDate>,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.team_id,
            team_name: team.team_name.clone(),
            game: team.game.clone(),
            timezone: team.timezone.clone(),
            zone: timezone::resolve(&team.timezone).name().to_string(),
            team_schedule_channel: team.team_schedule_channel.to_string(),
            last_synced: team.last_synced,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventTallyResponse {
    pub event_id: String,
    pub event_name: String,
    pub team_name: String,
    pub datetime: Option<DateTime<FixedOffset>>,
    pub attending: Vec<String>,
    pub tentative: Vec<String>,
    pub declined: Vec<String>,
    pub total: usize,
}

#[axum::debug_handler]
pub async fn list_teams(
    State(state): State<Arc<ApiState>>,
    Path(community_id): Path<String>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    let document = state.ctx.load_config().await?;
    let community = document
        .community(&community_id)
        .ok_or_else(|| SyncError::NotFound(format!("community {community_id}")))?;
    if !community.setup_complete {
        return Err(SyncError::SetupIncomplete(community_id).into());
    }

    Ok(Json(community.teams.iter().map(TeamSummary::from).collect()))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path((community_id, event_id)): Path<(String, MessageId)>,
) -> Result<Json<EventTallyResponse>, AppError> {
    let book = state.ctx.load_events(&community_id).await?;
    let record = book
        .get(event_id)
        .ok_or(SyncError::UnknownEventId(event_id))?;
    let tally = record.tally();

    Ok(Json(EventTallyResponse {
        event_id: event_id.to_string(),
        event_name: record.event_name.clone(),
        team_name: record.team_name.clone(),
        datetime: record.datetime,
        attending: ids(&tally.attending),
        tentative: ids(&tally.tentative),
        declined: ids(&tally.declined),
        total: tally.total(),
    }))
}

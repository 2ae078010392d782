use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::event::EventRecord;
use teamsync_core::models::{ChannelId, MessageId};
use teamsync_core::ports::Actor;
use teamsync_core::{render, timezone};
use tracing::{error, info};

use crate::admin;
use crate::context::SyncContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub record: EventRecord,
}

/// Parse "YYYY-MM-DD" plus a 24h `hhmm` value (e.g. 1930) into a time in `zone`.
pub fn localize(zone: Tz, date: &str, hhmm: u32) -> SyncResult<DateTime<Tz>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        SyncError::Validation(format!("invalid date '{date}', expected YYYY-MM-DD"))
    })?;
    let time = NaiveTime::from_hms_opt(hhmm / 100, hhmm % 100, 0).ok_or_else(|| {
        SyncError::Validation(format!("invalid time '{hhmm:04}', expected hhmm (24h)"))
    })?;

    match zone.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(at) => Ok(at),
        LocalResult::Ambiguous(_, _) => Err(SyncError::Validation(format!(
            "{date} {time} occurs twice in {zone}, pick another time"
        ))),
        LocalResult::None => Err(SyncError::Validation(format!(
            "{date} {time} does not exist in {zone}"
        ))),
    }
}

/// Post an RSVP message for a one-off team event and record it.
pub async fn create_event(
    ctx: &SyncContext,
    community_id: &str,
    actor: &Actor,
    team_name: &str,
    date: &str,
    hhmm: u32,
    event_name: &str,
) -> SyncResult<CreatedEvent> {
    let result = post_event(ctx, community_id, team_name, date, hhmm, event_name).await;

    let line = match &result {
        Ok(created) => format!(
            "Event '{}' created for team '{}' by {} in <#{}>",
            created.record.event_name,
            created.record.team_name,
            actor.describe(),
            created.channel_id
        ),
        Err(e) => format!(
            "Event creation for team '{}' by {} failed: {}",
            team_name.trim(),
            actor.describe(),
            e
        ),
    };
    ctx.audit(community_id, &line).await;
    result
}

async fn post_event(
    ctx: &SyncContext,
    community_id: &str,
    team_name: &str,
    date: &str,
    hhmm: u32,
    event_name: &str,
) -> SyncResult<CreatedEvent> {
    if event_name.trim().is_empty() {
        return Err(SyncError::Validation("event name must not be empty".to_string()));
    }

    let team = admin::find_team_by_name(ctx, community_id, team_name).await?;
    let at = localize(timezone::resolve(&team.timezone), date, hhmm)?;

    let channel_id = team.team_schedule_channel;
    let record = EventRecord::new(
        event_name.trim(),
        team.team_name.clone(),
        Some(team.team_id),
        channel_id,
        at.fixed_offset(),
    )
    .with_ping(team.team_role);

    let _guard = ctx.lock_documents().await;
    if !ctx.channel_available(channel_id).await? {
        return Err(SyncError::ChannelUnavailable(channel_id));
    }
    let message = render::event_message(&record, record.ping_role);
    let message_id = ctx.send(channel_id, &message).await?;
    info!(
        "Posted event '{}' ({}) for team '{}' in community {}",
        record.event_name, message_id, team.team_name, community_id
    );

    let mut book = ctx.load_events(community_id).await.inspect_err(|e| {
        error!("Event {} was posted but its record could not be loaded: {}", message_id, e)
    })?;
    book.insert(message_id, record.clone());
    ctx.save_events(community_id, &book).await.inspect_err(|e| {
        error!("Event {} was posted but its record could not be saved: {}", message_id, e)
    })?;

    Ok(CreatedEvent {
        message_id,
        channel_id,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rstest::rstest;

    #[test]
    fn localizes_in_team_zone() {
        let at = localize(Tz::Europe__Berlin, "2024-07-01", 1930).unwrap();
        assert_eq!(at.hour(), 19);
        assert_eq!(at.minute(), 30);
        assert_eq!(at.fixed_offset().offset().local_minus_utc(), 2 * 3600);
    }

    #[rstest]
    #[case("2024-13-01", 1200)]
    #[case("01/07/2024", 1200)]
    #[case("2024-07-01", 2400)]
    #[case("2024-07-01", 1260)]
    fn rejects_malformed_input(#[case] date: &str, #[case] hhmm: u32) {
        assert!(matches!(
            localize(Tz::UTC, date, hhmm),
            Err(SyncError::Validation(_))
        ));
    }

    #[test]
    fn rejects_skipped_and_repeated_local_times() {
        // Clocks jump from 02:00 to 03:00 on 2024-03-31 and back from 03:00 to 02:00 on 2024-10-27.
        assert!(matches!(
            localize(Tz::Europe__Berlin, "2024-03-31", 230),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(
            localize(Tz::Europe__Berlin, "2024-10-27", 230),
            Err(SyncError::Validation(_))
        ));
    }
}

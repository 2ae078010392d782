mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use teamsync_core::models::event::{EventBook, EventRecord, RsvpChoice};
use teamsync_engine::intake::{handle_rsvp, RsvpAction, RsvpRequest};
use teamsync_engine::testing::RecordingEmitter;
use test_utils::*;

const EVENT: u64 = 5000;
const CHANNEL: u64 = 10;

fn seeded() -> TestContext {
    seeded_with(Arc::new(RecordingEmitter::new()))
}

fn seeded_with(emitter: Arc<RecordingEmitter>) -> TestContext {
    let ctx = TestContext::with_emitter(
        document_with(vec![team("Falcons", CHANNEL, "Berlin")]),
        monday_noon_utc(),
        emitter,
    );
    let at = FixedOffset::east_opt(7200)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 8, 19, 0, 0)
        .unwrap();
    let mut book = EventBook::default();
    book.insert(EVENT, EventRecord::new("Scrim", "Falcons", None, CHANNEL, at));
    ctx.events.put(COMMUNITY, book);
    ctx
}

fn request(participant: u64, action: RsvpAction) -> RsvpRequest {
    RsvpRequest {
        community_id: COMMUNITY.to_string(),
        channel_id: CHANNEL,
        event_id: EVENT,
        participant,
        participant_name: format!("user{participant}"),
        action,
    }
}

#[test_log::test(tokio::test)]
async fn test_response_is_stored_and_tally_refreshed() {
    let ctx = seeded();

    let outcome = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending)))
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.tally.attending, vec![7]);
    assert_eq!(outcome.reply(), "You're marked as **Can Attend**.");
    assert_eq!(ctx.events.book(COMMUNITY).render_tally(EVENT).attending, vec![7]);

    let edits = ctx.emitter.edited();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message_id, EVENT);
    assert!(edits[0].message.content.contains("**Scrim**"));
    assert!(edits[0].message.content.contains("**Can Attend ✅ (1)**\n<@7>"));

    assert_eq!(
        ctx.audit.lines_for(COMMUNITY),
        vec!["user7 (7) RSVP'd 'Can Attend' on event 5000".to_string()]
    );
}

#[test_log::test(tokio::test)]
async fn test_switching_choice_is_exclusive() {
    let ctx = seeded();

    handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending))).await.unwrap();
    let outcome = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Declined)))
        .await
        .unwrap();

    assert_eq!(outcome.previous, Some(RsvpChoice::Attending));
    assert!(outcome.tally.attending.is_empty());
    assert!(outcome.tally.tentative.is_empty());
    assert_eq!(outcome.tally.declined, vec![7]);
    assert!(ctx.audit.lines_for(COMMUNITY)[1].contains("from 'Can Attend' to 'Can't Attend'"));
}

#[test_log::test(tokio::test)]
async fn test_repeated_choice_is_idempotent() {
    let ctx = seeded();

    handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Tentative))).await.unwrap();
    let saves = ctx.events.save_count();
    let outcome = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Tentative)))
        .await
        .unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.tally.tentative, vec![7]);
    assert_eq!(ctx.events.save_count(), saves);
    assert_eq!(ctx.emitter.edited().len(), 1);
    assert_eq!(ctx.audit.lines_for(COMMUNITY).len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_withdrawal_round_trip() {
    let ctx = seeded();

    handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending))).await.unwrap();
    let outcome = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Withdraw)).await.unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.tally.total(), 0);
    assert_eq!(outcome.reply(), "Your response has been removed.");
    assert_eq!(ctx.audit.lines_for(COMMUNITY)[1], "user7 (7) withdrew from event 5000");
}

#[test_log::test(tokio::test)]
async fn test_withdraw_without_response_is_audited() {
    let ctx = seeded();

    let outcome = handle_rsvp(&ctx.ctx, request(8, RsvpAction::Withdraw)).await.unwrap();

    assert!(!outcome.changed);
    assert_eq!(ctx.events.save_count(), 0);
    assert!(ctx.emitter.edited().is_empty());
    assert_eq!(
        ctx.audit.lines_for(COMMUNITY),
        vec!["user8 (8) tried to withdraw from event 5000 but was not signed up".to_string()]
    );
}

#[test_log::test(tokio::test)]
async fn test_unknown_event_is_materialized() {
    let ctx = seeded();
    let mut unknown = request(9, RsvpAction::Set(RsvpChoice::Attending));
    unknown.event_id = 6000;

    let outcome = handle_rsvp(&ctx.ctx, unknown).await.unwrap();

    assert!(outcome.materialized);
    let book = ctx.events.book(COMMUNITY);
    let record = book.get(6000).expect("record created");
    assert_eq!(record.attend, vec![9]);
    assert!(record.datetime.is_none());

    // The refresh falls back to the channel the interaction came from.
    assert_eq!(ctx.emitter.edited()[0].channel_id, CHANNEL);
}

#[test_log::test(tokio::test)]
async fn test_refresh_failure_is_not_fatal() {
    let ctx = seeded();
    ctx.emitter.mark_failing(CHANNEL);

    let outcome = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending)))
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(ctx.events.book(COMMUNITY).render_tally(EVENT).attending, vec![7]);
}

#[test_log::test(tokio::test)]
async fn test_save_failure_is_reported() {
    let ctx = seeded();
    ctx.events.fail_saves(true);

    let result = handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending))).await;

    assert!(result.is_err());
    assert!(ctx.emitter.edited().is_empty());
    let lines = ctx.audit.lines_for(COMMUNITY);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("user7 (7) RSVP on event 5000 failed"));
}

#[test_log::test(tokio::test)]
async fn test_slow_refresh_does_not_leave_a_stale_tally() {
    let emitter = Arc::new(RecordingEmitter::new());
    emitter.delay_next_edit(Duration::from_millis(100));
    let ctx = seeded_with(emitter);

    let shared = Arc::clone(&ctx.ctx);
    let first = tokio::spawn(async move {
        handle_rsvp(&shared, request(1, RsvpAction::Set(RsvpChoice::Attending))).await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle_rsvp(&ctx.ctx, request(2, RsvpAction::Set(RsvpChoice::Attending)))
        .await
        .unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(ctx.events.book(COMMUNITY).render_tally(EVENT).attending, vec![1, 2]);
    let edits = ctx.emitter.edited();
    let shown = &edits.last().unwrap().message.content;
    assert!(shown.contains("**Can Attend ✅ (2)**"));
    assert!(shown.contains("<@1>"));
    assert!(shown.contains("<@2>"));
}

#[test_log::test(tokio::test)]
async fn test_refresh_keeps_the_role_mention() {
    let ctx = seeded();
    let mut book = ctx.events.book(COMMUNITY);
    let record = book.events.remove(&EVENT).unwrap().with_ping(77);
    book.insert(EVENT, record);
    ctx.events.put(COMMUNITY, book);

    handle_rsvp(&ctx.ctx, request(7, RsvpAction::Set(RsvpChoice::Attending)))
        .await
        .unwrap();

    assert!(ctx.emitter.edited()[0].message.content.starts_with("<@&77>\n**Scrim**"));
}

#[test_log::test(tokio::test)]
async fn test_concurrent_responses_are_all_kept() {
    let ctx = seeded();

    let mut handles = Vec::new();
    for participant in 1..=20u64 {
        let shared = Arc::clone(&ctx.ctx);
        handles.push(tokio::spawn(async move {
            handle_rsvp(&shared, request(participant, RsvpAction::Set(RsvpChoice::Attending))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut attending = ctx.events.book(COMMUNITY).render_tally(EVENT).attending;
    attending.sort_unstable();
    assert_eq!(attending, (1..=20).collect::<Vec<_>>());
}

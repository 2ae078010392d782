use serde::{Deserialize, Serialize};
use teamsync_core::errors::SyncResult;
use teamsync_core::models::event::{RsvpChoice, Tally};
use teamsync_core::models::{ChannelId, MessageId, ParticipantId};
use teamsync_core::render;
use tracing::{debug, warn};

use crate::context::SyncContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsvpAction {
    Set(RsvpChoice),
    Withdraw,
}

/// One participant pressing one RSVP control. Identity is verified upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRequest {
    pub community_id: String,
    /// Channel the message lives in; used when the stored record does not know it.
    pub channel_id: ChannelId,
    pub event_id: MessageId,
    pub participant: ParticipantId,
    pub participant_name: String,
    pub action: RsvpAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpOutcome {
    pub action: RsvpAction,
    pub previous: Option<RsvpChoice>,
    pub changed: bool,
    /// The event was unknown and an empty record was created for it.
    pub materialized: bool,
    pub tally: Tally,
}

impl RsvpOutcome {
    /// Short confirmation for the participant.
    pub fn reply(&self) -> String {
        match (self.action, self.changed) {
            (RsvpAction::Set(choice), true) => format!("You're marked as **{}**.", choice.label()),
            (RsvpAction::Set(choice), false) => {
                format!("You're already marked as **{}**.", choice.label())
            }
            (RsvpAction::Withdraw, true) => "Your response has been removed.".to_string(),
            (RsvpAction::Withdraw, false) => "You haven't responded to this event.".to_string(),
        }
    }

    fn audit_line(&self, request: &RsvpRequest) -> String {
        let who = format!("{} ({})", request.participant_name, request.participant);
        match (self.action, self.changed) {
            (RsvpAction::Set(choice), true) => match self.previous {
                Some(previous) => format!(
                    "{} changed RSVP on event {} from '{}' to '{}'",
                    who,
                    request.event_id,
                    previous.label(),
                    choice.label()
                ),
                None => format!(
                    "{} RSVP'd '{}' on event {}",
                    who,
                    choice.label(),
                    request.event_id
                ),
            },
            (RsvpAction::Set(choice), false) => format!(
                "{} repeated RSVP '{}' on event {}",
                who,
                choice.label(),
                request.event_id
            ),
            (RsvpAction::Withdraw, true) => {
                format!("{} withdrew from event {}", who, request.event_id)
            }
            (RsvpAction::Withdraw, false) => format!(
                "{} tried to withdraw from event {} but was not signed up",
                who, request.event_id
            ),
        }
    }
}

/// Apply one RSVP: update the community's event document, refresh the posted
/// tally and write an audit line.
pub async fn handle_rsvp(ctx: &SyncContext, request: RsvpRequest) -> SyncResult<RsvpOutcome> {
    let outcome = match apply(ctx, &request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let line = format!(
                "{} ({}) RSVP on event {} failed: {}",
                request.participant_name, request.participant, request.event_id, e
            );
            ctx.audit(&request.community_id, &line).await;
            return Err(e);
        }
    };

    if outcome.materialized {
        warn!(
            "RSVP for unknown event {} in community {}; created an empty record",
            request.event_id, request.community_id
        );
    }

    if outcome.changed {
        refresh_tally(ctx, &request).await;
    } else {
        debug!("Tally of event {} unchanged, no refresh", request.event_id);
    }

    let line = outcome.audit_line(&request);
    ctx.audit(&request.community_id, &line).await;

    Ok(outcome)
}

async fn apply(ctx: &SyncContext, request: &RsvpRequest) -> SyncResult<RsvpOutcome> {
    let _guard = ctx.lock_documents().await;
    let mut book = ctx.load_events(&request.community_id).await?;
    let previous = book
        .get(request.event_id)
        .and_then(|record| record.response_of(request.participant));

    let (changed, materialized) = match request.action {
        RsvpAction::Set(choice) => {
            let update = book.set_response(request.event_id, request.participant, choice);
            (update.changed, update.materialized)
        }
        RsvpAction::Withdraw => (
            book.clear_response(request.event_id, request.participant),
            false,
        ),
    };

    if changed {
        ctx.save_events(&request.community_id, &book).await?;
    }

    Ok(RsvpOutcome {
        action: request.action,
        previous,
        changed,
        materialized,
        tally: book.render_tally(request.event_id),
    })
}

/// Re-render the posted message from the stored ledger, not from the caller's copy.
async fn refresh_tally(ctx: &SyncContext, request: &RsvpRequest) {
    let _refresh = ctx.lock_refreshes().await;
    let book = match ctx.load_events(&request.community_id).await {
        Ok(book) => book,
        Err(e) => {
            warn!(
                "Could not reload event {} for its tally refresh: {}",
                request.event_id, e
            );
            return;
        }
    };
    let Some(record) = book.get(request.event_id) else {
        return;
    };

    let channel_id = record.channel_id.unwrap_or(request.channel_id);
    let message = render::event_message(record, record.ping_role);
    if let Err(e) = ctx.edit(channel_id, request.event_id, &message).await {
        warn!(
            "Could not refresh tally of event {} in channel {}: {}",
            request.event_id, channel_id, e
        );
    }
}

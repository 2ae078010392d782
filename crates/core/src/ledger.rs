//! RSVP ledger rules.
//!
//! A participant appears in at most one of an event's three response lists. Every
//! mutation removes the participant from all lists before inserting it into the
//! chosen one, so a retried request always lands in the same state.

use serde::{Deserialize, Serialize};

use crate::models::event::{EventBook, EventRecord, RsvpChoice, Tally};
use crate::models::{MessageId, ParticipantId};

/// Result of applying a response to an [`EventBook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub tally: Tally,
    /// False when the participant already held exactly this response.
    pub changed: bool,
    /// True when the event id was unknown and an empty record was created for it.
    pub materialized: bool,
}

impl EventRecord {
    fn list_mut(&mut self, choice: RsvpChoice) -> &mut Vec<ParticipantId> {
        match choice {
            RsvpChoice::Attending => &mut self.attend,
            RsvpChoice::Tentative => &mut self.maybe,
            RsvpChoice::Declined => &mut self.cant,
        }
    }

    fn list(&self, choice: RsvpChoice) -> &[ParticipantId] {
        match choice {
            RsvpChoice::Attending => &self.attend,
            RsvpChoice::Tentative => &self.maybe,
            RsvpChoice::Declined => &self.cant,
        }
    }

    /// The participant's current response, if any.
    pub fn response_of(&self, participant: ParticipantId) -> Option<RsvpChoice> {
        RsvpChoice::ALL
            .into_iter()
            .find(|choice| self.list(*choice).contains(&participant))
    }

    /// Moves `participant` into the list for `choice`. Returns whether anything changed.
    pub fn set_response(&mut self, participant: ParticipantId, choice: RsvpChoice) -> bool {
        let already_exclusive = RsvpChoice::ALL.into_iter().all(|other| {
            let occurrences = self.list(other).iter().filter(|id| **id == participant).count();
            if other == choice { occurrences == 1 } else { occurrences == 0 }
        });
        if already_exclusive {
            return false;
        }

        self.clear_response(participant);
        self.list_mut(choice).push(participant);
        true
    }

    /// Removes `participant` from every list. Returns whether it was present anywhere.
    pub fn clear_response(&mut self, participant: ParticipantId) -> bool {
        let mut removed = false;
        for choice in RsvpChoice::ALL {
            let list = self.list_mut(choice);
            let before = list.len();
            list.retain(|id| *id != participant);
            removed |= list.len() != before;
        }
        removed
    }

    pub fn tally(&self) -> Tally {
        Tally {
            attending: self.attend.clone(),
            tentative: self.maybe.clone(),
            declined: self.cant.clone(),
        }
    }
}

impl EventBook {
    pub fn get(&self, event_id: MessageId) -> Option<&EventRecord> {
        self.events.get(&event_id)
    }

    pub fn insert(&mut self, event_id: MessageId, record: EventRecord) {
        self.events.insert(event_id, record);
    }

    /// Records `choice` for `participant`, creating an empty record for an unknown event.
    pub fn set_response(
        &mut self,
        event_id: MessageId,
        participant: ParticipantId,
        choice: RsvpChoice,
    ) -> LedgerUpdate {
        let materialized = !self.events.contains_key(&event_id);
        let record = self.events.entry(event_id).or_default();
        let changed = record.set_response(participant, choice);
        LedgerUpdate {
            tally: record.tally(),
            changed: changed || materialized,
            materialized,
        }
    }

    /// Withdraws `participant`. An unknown event has nothing to withdraw and is left absent.
    pub fn clear_response(&mut self, event_id: MessageId, participant: ParticipantId) -> bool {
        self.events
            .get_mut(&event_id)
            .map(|record| record.clear_response(participant))
            .unwrap_or(false)
    }

    /// Current responses; an unknown event renders as empty.
    pub fn render_tally(&self, event_id: MessageId) -> Tally {
        self.events
            .get(&event_id)
            .map(EventRecord::tally)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const EVENT: MessageId = 1_100;
    const ALICE: ParticipantId = 7;
    const BOB: ParticipantId = 8;

    fn book_with_event() -> EventBook {
        let mut book = EventBook::default();
        book.insert(EVENT, EventRecord::default());
        book
    }

    #[test]
    fn later_choice_replaces_earlier_one() {
        let mut book = book_with_event();
        book.set_response(EVENT, ALICE, RsvpChoice::Attending);
        let update = book.set_response(EVENT, ALICE, RsvpChoice::Declined);

        assert_eq!(update.tally.declined, vec![ALICE]);
        assert!(update.tally.attending.is_empty());
        assert!(update.tally.tentative.is_empty());
        assert!(update.changed);
    }

    #[rstest]
    #[case(RsvpChoice::Attending)]
    #[case(RsvpChoice::Tentative)]
    #[case(RsvpChoice::Declined)]
    fn repeating_a_choice_is_idempotent(#[case] choice: RsvpChoice) {
        let mut book = book_with_event();
        let first = book.set_response(EVENT, ALICE, choice);
        let snapshot = book.clone();
        let second = book.set_response(EVENT, ALICE, choice);

        assert_eq!(first.tally, second.tally);
        assert_eq!(book, snapshot);
        assert!(!second.changed);
    }

    #[test]
    fn repeat_keeps_position_in_answer_order() {
        let mut book = book_with_event();
        book.set_response(EVENT, ALICE, RsvpChoice::Attending);
        book.set_response(EVENT, BOB, RsvpChoice::Attending);
        book.set_response(EVENT, ALICE, RsvpChoice::Attending);

        assert_eq!(book.render_tally(EVENT).attending, vec![ALICE, BOB]);
    }

    #[test]
    fn withdrawal_removes_from_every_list() {
        let mut book = book_with_event();
        book.set_response(EVENT, ALICE, RsvpChoice::Attending);

        assert!(book.clear_response(EVENT, ALICE));
        assert_eq!(book.render_tally(EVENT), Tally::default());
        assert!(!book.clear_response(EVENT, ALICE));
    }

    #[test]
    fn unknown_event_is_materialized_on_write() {
        let mut book = EventBook::default();
        let update = book.set_response(EVENT, ALICE, RsvpChoice::Tentative);

        assert!(update.materialized);
        assert!(update.changed);
        assert_eq!(update.tally.tentative, vec![ALICE]);
        assert!(book.get(EVENT).is_some());
    }

    #[test]
    fn unknown_event_withdrawal_creates_nothing() {
        let mut book = EventBook::default();

        assert!(!book.clear_response(EVENT, ALICE));
        assert!(book.get(EVENT).is_none());
        assert_eq!(book.render_tally(EVENT), Tally::default());
    }

    #[test]
    fn duplicated_legacy_entries_are_collapsed() {
        let mut record = EventRecord {
            attend: vec![ALICE, BOB, ALICE],
            cant: vec![ALICE],
            ..EventRecord::default()
        };

        assert!(record.set_response(ALICE, RsvpChoice::Attending));
        assert_eq!(record.attend, vec![BOB, ALICE]);
        assert!(record.cant.is_empty());
        assert_eq!(record.response_of(ALICE), Some(RsvpChoice::Attending));
    }
}

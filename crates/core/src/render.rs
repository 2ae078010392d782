//! Text for the messages the bot posts. The emitter decides how controls are drawn;
//! this module only produces content.

use chrono::{DateTime, Datelike, TimeZone};

use crate::models::event::{EventRecord, RsvpChoice, Tally};
use crate::models::{ParticipantId, RoleId};
use crate::ports::OutgoingMessage;

const NOBODY: &str = "No one yet";

pub fn role_mention(role_id: RoleId) -> String {
    format!("<@&{role_id}>")
}

pub fn user_mention(user_id: ParticipantId) -> String {
    format!("<@{user_id}>")
}

/// Event name of a weekly prompt, e.g. "Scheduling for Monday: The 06 of May".
pub fn weekly_event_name<Tz: TimeZone>(local: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Scheduling for {}", local.format("%A: The %d of %B"))
}

/// Heading lines of an event: name, team and time, each when known.
fn heading(record: &EventRecord) -> String {
    let mut lines = Vec::new();
    if !record.event_name.is_empty() {
        lines.push(format!("**{}**", record.event_name));
    }
    if !record.team_name.is_empty() {
        lines.push(format!("Team: {}", record.team_name));
    }
    if let Some(at) = record.datetime {
        lines.push(format!("**Event Time:** <t:{}:F>", at.timestamp()));
        lines.push(format!(
            "**Date:** {}, {} {:02}, {}",
            at.format("%A"),
            at.format("%B"),
            at.day(),
            at.year()
        ));
        lines.push(format!(
            "**Time:** {} (UTC{})",
            at.format("%I:%M %p"),
            at.format("%:z")
        ));
    }
    lines.join("\n")
}

/// One section per response, in fixed order, each listing participants in answer order.
pub fn tally_section(tally: &Tally) -> String {
    RsvpChoice::ALL
        .into_iter()
        .map(|choice| {
            let ids = tally.for_choice(choice);
            let names = if ids.is_empty() {
                NOBODY.to_string()
            } else {
                ids.iter().map(|id| user_mention(*id)).collect::<Vec<_>>().join("\n")
            };
            format!("**{} {} ({})**\n{}", choice.label(), choice.emoji(), ids.len(), names)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full RSVP message for an event. `ping` prefixes a role mention for the initial post.
pub fn event_message(record: &EventRecord, ping: Option<RoleId>) -> OutgoingMessage {
    let mut content = String::new();
    if let Some(role) = ping {
        content.push_str(&role_mention(role));
        content.push('\n');
    }
    let heading = heading(record);
    if !heading.is_empty() {
        content.push_str(&heading);
        content.push_str("\n\n");
    }
    content.push_str("Use the buttons below to RSVP!\n\n");
    content.push_str(&tally_section(&record.tally()));
    OutgoingMessage::with_rsvp(content)
}

/// Announcement broadcast to update-log channels.
pub fn update_announcement(text: &str) -> OutgoingMessage {
    OutgoingMessage::plain(format!("📢 **Update:**\n{}", text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn weekly_name_uses_local_date() {
        let local = chrono_tz::Tz::Asia__Tokyo
            .with_ymd_and_hms(2024, 5, 6, 12, 0, 0)
            .unwrap();
        assert_eq!(weekly_event_name(&local), "Scheduling for Monday: The 06 of May");
    }

    #[test]
    fn empty_tally_shows_placeholders() {
        let text = tally_section(&Tally::default());
        assert_eq!(text.matches(NOBODY).count(), 3);
        assert!(text.starts_with("**Can Attend ✅ (0)**"));
    }

    #[test]
    fn event_message_lists_participants_in_order() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, 19, 30, 0)
            .unwrap();
        let mut record = EventRecord::new("Scrim", "Falcons", None, 10, at);
        record.attend = vec![3, 1];

        let message = event_message(&record, Some(99));

        assert!(message.rsvp_controls);
        assert!(message.content.starts_with("<@&99>\n**Scrim**"));
        assert!(message.content.contains(&format!("<t:{}:F>", at.with_timezone(&Utc).timestamp())));
        assert!(message.content.contains("**Can Attend ✅ (2)**\n<@3>\n<@1>"));
        assert!(message.content.contains("07:30 PM (UTC+02:00)"));
    }

    #[test]
    fn lazily_created_record_renders_tally_only() {
        let mut record = EventRecord::default();
        record.maybe = vec![8];

        let message = event_message(&record, None);

        assert!(message.content.starts_with("Use the buttons below to RSVP!"));
        assert!(message.content.contains("**May be able to 🤔 (1)**\n<@8>"));
    }
}

//! RSVP buttons attached to event and weekly prompt messages.

use serenity::builder::CreateComponents;
use serenity::model::application::component::ButtonStyle;
use serenity::model::channel::ReactionType;
use teamsync_core::models::event::RsvpChoice;
use teamsync_engine::intake::RsvpAction;

pub const RSVP_ATTEND: &str = "rsvp_attend";
pub const RSVP_MAYBE: &str = "rsvp_maybe";
pub const RSVP_CANT: &str = "rsvp_cant";
pub const RSVP_REMOVE: &str = "rsvp_remove";

fn custom_id(choice: RsvpChoice) -> &'static str {
    match choice {
        RsvpChoice::Attending => RSVP_ATTEND,
        RsvpChoice::Tentative => RSVP_MAYBE,
        RsvpChoice::Declined => RSVP_CANT,
    }
}

fn style(choice: RsvpChoice) -> ButtonStyle {
    match choice {
        RsvpChoice::Attending => ButtonStyle::Success,
        RsvpChoice::Tentative => ButtonStyle::Primary,
        RsvpChoice::Declined => ButtonStyle::Danger,
    }
}

/// Map a pressed button back to the action it stands for.
pub fn rsvp_action(custom_id: &str) -> Option<RsvpAction> {
    match custom_id {
        RSVP_ATTEND => Some(RsvpAction::Set(RsvpChoice::Attending)),
        RSVP_MAYBE => Some(RsvpAction::Set(RsvpChoice::Tentative)),
        RSVP_CANT => Some(RsvpAction::Set(RsvpChoice::Declined)),
        RSVP_REMOVE => Some(RsvpAction::Withdraw),
        _ => None,
    }
}

pub fn rsvp_buttons(components: &mut CreateComponents) -> &mut CreateComponents {
    components.create_action_row(|row| {
        for choice in RsvpChoice::ALL {
            row.create_button(|b| {
                b.custom_id(custom_id(choice))
                    .label(choice.label())
                    .emoji(ReactionType::Unicode(choice.emoji().to_string()))
                    .style(style(choice))
            });
        }
        row.create_button(|b| {
            b.custom_id(RSVP_REMOVE)
                .label("Remove RSVP")
                .style(ButtonStyle::Secondary)
        })
    })
}

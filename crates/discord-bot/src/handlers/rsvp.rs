use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use teamsync_engine::intake::RsvpRequest;

use crate::components::rsvp_action;
use crate::handlers::actor_for;

/// Turn an RSVP button press into an intake request. Other components and
/// presses outside a server yield `None`.
pub fn request_from(component: &MessageComponentInteraction) -> Option<RsvpRequest> {
    let action = rsvp_action(&component.data.custom_id)?;
    let guild_id = component.guild_id?;
    let actor = actor_for(&component.user, component.member.as_ref());

    Some(RsvpRequest {
        community_id: guild_id.0.to_string(),
        channel_id: component.channel_id.0,
        event_id: component.message.id.0,
        participant: actor.user_id,
        participant_name: actor.display_name,
        action,
    })
}

use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::render::role_mention;
use teamsync_engine::admin::{self, LogChannel};

use super::{BotState, Invocation};
use crate::options;

fn channel_mention(channel_id: u64) -> String {
    format!("<#{channel_id}>")
}

/// Handle the /setup command
pub async fn handle_setup(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let bot_channel = options::snowflake(&invocation.options, "command_channel")?;
    let admin_role = options::snowflake(&invocation.options, "admin_role")?;

    admin::complete_setup(
        &state.sync,
        &invocation.community_id,
        &invocation.actor,
        bot_channel,
        admin_role,
    )
    .await?;

    Ok(format!(
        "Setup complete! Channel(s): {} ({}), Admin role(s): {}.",
        channel_mention(bot_channel),
        bot_channel,
        role_mention(admin_role)
    ))
}

/// Handle /addbotchannel, /removebotchannel and /listbotchannels
pub async fn handle_bot_channels(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let community = invocation.community_id.as_str();
    match invocation.name.as_str() {
        "addbotchannel" => {
            let channel = options::snowflake(&invocation.options, "channel")?;
            admin::add_bot_channel(&state.sync, community, &invocation.actor, channel).await?;
            Ok(format!("Added {} as a bot channel.", channel_mention(channel)))
        }
        "removebotchannel" => {
            let channel = options::snowflake(&invocation.options, "channel")?;
            admin::remove_bot_channel(&state.sync, community, &invocation.actor, channel).await?;
            Ok(format!("Removed {} from the bot channels.", channel_mention(channel)))
        }
        _ => {
            let channels = admin::list_bot_channels(&state.sync, community).await?;
            if channels.is_empty() {
                return Ok("No bot channels configured.".to_string());
            }
            let here = admin::is_bot_channel(&state.sync, community, invocation.channel_id).await?;
            let mut lines: Vec<String> = channels.into_iter().map(channel_mention).collect();
            if here {
                lines.push("This channel is a bot channel.".to_string());
            }
            Ok(format!("Bot channels:\n{}", lines.join("\n")))
        }
    }
}

/// Handle /addadminrole, /removeadminrole and /listadminroles
pub async fn handle_admin_roles(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let community = invocation.community_id.as_str();
    match invocation.name.as_str() {
        "addadminrole" => {
            let role = options::snowflake(&invocation.options, "role")?;
            admin::add_admin_role(&state.sync, community, &invocation.actor, role).await?;
            Ok(format!("Added {} as an admin role.", role_mention(role)))
        }
        "removeadminrole" => {
            let role = options::snowflake(&invocation.options, "role")?;
            admin::remove_admin_role(&state.sync, community, &invocation.actor, role).await?;
            Ok(format!("Removed {} from the admin roles.", role_mention(role)))
        }
        _ => {
            let roles = admin::list_admin_roles(&state.sync, community).await?;
            if roles.is_empty() {
                return Ok("No admin roles configured.".to_string());
            }
            let lines: Vec<String> = roles.into_iter().map(role_mention).collect();
            Ok(format!("Admin roles:\n{}", lines.join("\n")))
        }
    }
}

/// Handle the /setlogchannel command
pub async fn handle_log_channel(state: &BotState, invocation: &Invocation) -> SyncResult<String> {
    let which = match options::string(&invocation.options, "kind")?.as_str() {
        "updates" => LogChannel::Updates,
        "bot" => LogChannel::BotLogs,
        other => return Err(SyncError::Validation(format!("unknown log channel '{other}'"))),
    };
    let channel = options::optional_snowflake(&invocation.options, "channel")?;

    admin::set_log_channel(
        &state.sync,
        &invocation.community_id,
        &invocation.actor,
        which,
        channel,
    )
    .await?;

    let label = match which {
        LogChannel::Updates => "Update log",
        LogChannel::BotLogs => "Bot log",
    };
    Ok(match channel {
        Some(id) => format!("{} channel set to {}.", label, channel_mention(id)),
        None => format!("{label} channel cleared."),
    })
}

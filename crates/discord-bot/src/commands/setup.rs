use serenity::{
    builder::CreateApplicationCommand,
    model::{
        application::command::CommandOptionType, channel::ChannelType, permissions::Permissions,
    },
};

pub fn setup_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("setup")
        .description("Setup the bot in this server")
        .dm_permission(false)
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .create_option(|option| {
            option
                .name("command_channel")
                .description("Channel where the bot accepts commands")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text])
                .required(true)
        })
        .create_option(|option| {
            option
                .name("admin_role")
                .description("Role allowed to manage the bot")
                .kind(CommandOptionType::Role)
                .required(true)
        });

    command
}

pub fn bot_channel_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(name)
        .description(description)
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("channel")
                .description("The text channel")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text])
                .required(true)
        });

    command
}

pub fn admin_role_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(name)
        .description(description)
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("role")
                .description("The role")
                .kind(CommandOptionType::Role)
                .required(true)
        });

    command
}

pub fn list_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name(name).description(description).dm_permission(false);
    command
}

/// Set or clear the update / bot log channel. Leaving `channel` out clears it.
pub fn log_channel_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("setlogchannel")
        .description("Set or clear a log channel")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("kind")
                .description("Which log channel")
                .kind(CommandOptionType::String)
                .add_string_choice("Update announcements", "updates")
                .add_string_choice("Bot activity", "bot")
                .required(true)
        })
        .create_option(|option| {
            option
                .name("channel")
                .description("Channel to use; leave empty to clear")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text])
                .required(false)
        });

    command
}

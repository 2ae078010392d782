use serenity::builder::{CreateApplicationCommand, CreateApplicationCommands};

pub mod event;
pub mod setup;
pub mod team;

/// Every slash command the bot answers, in registration order.
pub fn all_commands() -> Vec<CreateApplicationCommand> {
    vec![
        setup::setup_command(),
        setup::bot_channel_command("addbotchannel", "Add a bot channel"),
        setup::bot_channel_command("removebotchannel", "Remove a bot channel"),
        setup::list_command("listbotchannels", "List all bot channels"),
        setup::admin_role_command("addadminrole", "Add an admin role"),
        setup::admin_role_command("removeadminrole", "Remove an admin role"),
        setup::list_command("listadminroles", "List all admin roles"),
        setup::log_channel_command(),
        team::create_team_command(),
        team::list_teams_command(),
        team::delete_team_command(),
        team::modify_team_command(),
        event::event_command(),
        event::sync_now_command(),
        event::update_command(),
        event::help_command(),
        event::version_command(),
    ]
}

/// Register all commands for the bot.
pub fn register_commands(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    for built in all_commands() {
        commands.create_application_command(|command| {
            *command = built;
            command
        });
    }
    commands
}

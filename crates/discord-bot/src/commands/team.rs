use serenity::{
    builder::CreateApplicationCommand,
    model::{application::command::CommandOptionType, channel::ChannelType},
};

pub fn create_team_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("create_team")
        .description("Create a new team")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("team_name")
                .description("Name of the team")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("game")
                .description("Game the team plays")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("team_cap_role")
                .description("Captain role")
                .kind(CommandOptionType::Role)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("team_schedule_channel")
                .description("Channel for the weekly schedule")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text])
                .required(true)
        })
        .create_option(|option| {
            option
                .name("timezone")
                .description("Team timezone")
                .kind(CommandOptionType::String)
                .set_autocomplete(true)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("team_role")
                .description("Role pinged by prompts (defaults to the captain role)")
                .kind(CommandOptionType::Role)
                .required(false)
        });

    command
}

pub fn list_teams_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("list_teams")
        .description("List all teams in this server.")
        .dm_permission(false);
    command
}

pub fn delete_team_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("delete_team")
        .description("Delete a team from this server.")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("team")
                .description("Team to delete")
                .kind(CommandOptionType::String)
                .set_autocomplete(true)
                .required(true)
        });
    command
}

pub fn modify_team_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("modify_team")
        .description("Modify a team's details.")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("team")
                .description("Team to modify")
                .kind(CommandOptionType::String)
                .set_autocomplete(true)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("field")
                .description("What to change")
                .kind(CommandOptionType::String)
                .add_string_choice("Name", "name")
                .add_string_choice("Game", "game")
                .add_string_choice("Captain role", "captain_role")
                .add_string_choice("Team role", "team_role")
                .add_string_choice("Schedule channel", "schedule_channel")
                .add_string_choice("Timezone", "timezone")
                .required(true)
        })
        .create_option(|option| {
            option
                .name("value")
                .description("New value; roles and channels as a mention or id")
                .kind(CommandOptionType::String)
                .set_autocomplete(true)
                .required(true)
        });
    command
}

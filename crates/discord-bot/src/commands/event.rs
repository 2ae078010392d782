use serenity::{builder::CreateApplicationCommand, model::application::command::CommandOptionType};

/// Create command for one-off team events
pub fn event_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("event")
        .description("Create a team event with RSVP buttons.")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("team_name")
                .description("The team for the event.")
                .kind(CommandOptionType::String)
                .set_autocomplete(true)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("date")
                .description("The date for the event (YYYY-MM-DD).")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("time")
                .description("The time for the event (hhmm, 24hr format).")
                .kind(CommandOptionType::Integer)
                .min_int_value(0)
                .max_int_value(2359)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("event_name")
                .description("The name of the event.")
                .kind(CommandOptionType::String)
                .required(true)
        });

    command
}

pub fn sync_now_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("sync_now")
        .description("Post this week's scheduling prompt for every team that has not had one today")
        .dm_permission(false);
    command
}

pub fn update_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("update")
        .description("Send the latest update to every server's update log channel")
        .dm_permission(false);
    command
}

pub fn help_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("help").description("Show help information");
    command
}

pub fn version_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("version").description("Show bot version");
    command
}

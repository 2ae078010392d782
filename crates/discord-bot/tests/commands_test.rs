use std::collections::HashSet;

use serenity::builder::CreateApplicationCommands;
use teamsync_discord_bot::commands;

fn command_name(command: &serenity::builder::CreateApplicationCommand) -> String {
    command
        .0
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[test]
fn test_register_commands() {
    let mut registered = CreateApplicationCommands::default();
    commands::register_commands(&mut registered);
    assert_eq!(registered.0.len(), commands::all_commands().len());
}

#[test]
fn test_command_names_are_unique_and_dispatched() {
    let names: Vec<String> = commands::all_commands().iter().map(command_name).collect();
    let unique: HashSet<&String> = names.iter().collect();

    assert_eq!(unique.len(), names.len());
    for expected in ["setup", "create_team", "modify_team", "event", "sync_now", "update"] {
        assert!(names.iter().any(|n| n == expected), "missing /{expected}");
    }
}

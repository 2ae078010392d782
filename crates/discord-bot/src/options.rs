//! Typed access to slash-command options.
//!
//! Discord sends snowflakes (users, roles, channels) as strings and integers
//! as JSON numbers; both shapes are accepted where an id is expected.

use serenity::model::application::interaction::application_command::CommandDataOption;
use serde_json::Value;
use teamsync_core::errors::{SyncError, SyncResult};

pub fn find<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOption> {
    options.iter().find(|o| o.name == name)
}

fn missing(name: &str) -> SyncError {
    SyncError::Validation(format!("missing option '{name}'"))
}

pub fn optional_string(options: &[CommandDataOption], name: &str) -> Option<String> {
    match find(options, name)?.value.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string(options: &[CommandDataOption], name: &str) -> SyncResult<String> {
    optional_string(options, name).ok_or_else(|| missing(name))
}

pub fn optional_snowflake(options: &[CommandDataOption], name: &str) -> SyncResult<Option<u64>> {
    let Some(option) = find(options, name) else {
        return Ok(None);
    };
    let parsed = match option.value.as_ref() {
        Some(Value::String(s)) => parse_snowflake(s),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| SyncError::Validation(format!("option '{name}' is not a valid id")))
}

pub fn snowflake(options: &[CommandDataOption], name: &str) -> SyncResult<u64> {
    optional_snowflake(options, name)?.ok_or_else(|| missing(name))
}

pub fn integer(options: &[CommandDataOption], name: &str) -> SyncResult<i64> {
    find(options, name)
        .and_then(|o| o.value.as_ref())
        .and_then(Value::as_i64)
        .ok_or_else(|| missing(name))
}

/// Accepts a bare id or a mention such as `<@&123>` or `<#123>`.
pub fn parse_snowflake(text: &str) -> Option<u64> {
    let digits = text
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_start_matches(['@', '#', '&', '!']);
    digits.parse().ok()
}

/// The first option when it is a subcommand: its name and its own options.
pub fn subcommand(options: &[CommandDataOption]) -> SyncResult<(&str, &[CommandDataOption])> {
    options
        .first()
        .map(|o| (o.name.as_str(), o.options.as_slice()))
        .ok_or_else(|| SyncError::Validation("missing subcommand".to_string()))
}

/// The option the user is typing into during autocomplete, with its partial text.
pub fn focused(options: &[CommandDataOption]) -> Option<(&str, String)> {
    options.iter().find_map(|o| {
        if o.focused {
            let text = match o.value.as_ref() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            Some((o.name.as_str(), text))
        } else {
            focused(&o.options)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn options(value: Value) -> Vec<CommandDataOption> {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case("123", Some(123))]
    #[case("<@&456>", Some(456))]
    #[case("<#789>", Some(789))]
    #[case("<@!42>", Some(42))]
    #[case("general", None)]
    fn parses_ids_and_mentions(#[case] text: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_snowflake(text), expected);
    }

    #[test]
    fn reads_typed_values() {
        let opts = options(json!([
            { "name": "team_name", "type": 3, "value": "Falcons" },
            { "name": "time", "type": 4, "value": 1930 },
            { "name": "channel", "type": 7, "value": "555" }
        ]));

        assert_eq!(string(&opts, "team_name").unwrap(), "Falcons");
        assert_eq!(integer(&opts, "time").unwrap(), 1930);
        assert_eq!(snowflake(&opts, "channel").unwrap(), 555);
        assert_eq!(optional_snowflake(&opts, "role").unwrap(), None);
        assert!(matches!(string(&opts, "game"), Err(SyncError::Validation(_))));
    }

    #[test]
    fn finds_focused_option_inside_subcommand() {
        let opts = options(json!([
            { "name": "edit", "type": 1, "options": [
                { "name": "team", "type": 3, "value": "fal", "focused": true }
            ]}
        ]));

        assert_eq!(focused(&opts), Some(("team", "fal".to_string())));
        let (name, inner) = subcommand(&opts).unwrap();
        assert_eq!(name, "edit");
        assert_eq!(inner.len(), 1);
    }
}

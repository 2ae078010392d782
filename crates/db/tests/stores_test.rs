use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use teamsync_core::errors::SyncError;
use teamsync_core::models::community::{CommunityConfig, ConfigDocument};
use teamsync_core::models::event::{EventBook, EventRecord, RsvpChoice};
use teamsync_core::ports::{ConfigStore, EventStore};
use teamsync_db::open_stores;

const LEGACY_SERVERS: &str = r#"{
  "42": {
    "SetupComplete": true,
    "bot_channels": ["10"],
    "admin_roles": ["20"],
    "teams": [
      {
        "team_name": "Falcons",
        "team_cap_role": 30,
        "team_role": 31,
        "team_schedule_channel": 40,
        "timezone": "Berlin",
        "created_at": "2024-01-01"
      }
    ]
  }
}"#;

#[tokio::test]
async fn test_fresh_data_dir_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (config, events) = open_stores(dir.path()).await.unwrap();

    assert!(config.load().await.unwrap().communities.is_empty());
    assert!(events.load_events("42").await.unwrap().events.is_empty());
    assert!(dir.path().join("servers.json").is_file());
    assert!(dir.path().join("events").is_dir());
}

#[tokio::test]
async fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (config, _) = open_stores(dir.path()).await.unwrap();

    let mut document = ConfigDocument::default();
    document
        .communities
        .insert("7".to_string(), CommunityConfig::pending());
    config.save(&document).await.unwrap();

    assert_eq!(config.load().await.unwrap(), document);
}

#[tokio::test]
async fn test_team_id_migration_runs_once() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("servers.json"), LEGACY_SERVERS).unwrap();
    let (config, _) = open_stores(dir.path()).await.unwrap();

    assert_eq!(config.migrate_team_ids().await.unwrap(), 1);
    let first = config.load().await.unwrap().community("42").unwrap().teams[0].team_id;
    assert!(!first.is_nil());

    assert_eq!(config.migrate_team_ids().await.unwrap(), 0);
    let second = config.load().await.unwrap().community("42").unwrap().teams[0].team_id;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_event_books_are_kept_per_community() {
    let dir = tempfile::tempdir().unwrap();
    let (_, events) = open_stores(dir.path()).await.unwrap();

    let at = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 6, 12, 0, 0)
        .unwrap();
    let mut book = EventBook::default();
    book.insert(900, EventRecord::new("Scrim", "Falcons", None, 40, at));
    book.set_response(900, 5, RsvpChoice::Attending);

    events.save_events("42", &book).await.unwrap();

    assert_eq!(events.load_events("42").await.unwrap(), book);
    assert!(events.load_events("43").await.unwrap().events.is_empty());
    assert!(dir.path().join("events").join("42.json").is_file());
}

#[tokio::test]
async fn test_event_store_rejects_path_like_ids() {
    let dir = tempfile::tempdir().unwrap();
    let (_, events) = open_stores(dir.path()).await.unwrap();

    let result = events.save_events("../servers", &EventBook::default()).await;
    assert!(matches!(result, Err(SyncError::Validation(_))));
}

#[tokio::test]
async fn test_corrupt_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("servers.json"), "[1, 2").unwrap();
    let (config, _) = open_stores(dir.path()).await.unwrap();

    assert!(matches!(config.load().await, Err(SyncError::Persistence(_))));
}

#[tokio::test]
async fn test_malformed_team_does_not_block_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let servers = r#"{
  "1": {
    "SetupComplete": true,
    "teams": [
      {"team_name": "Falcons", "team_cap_role": 30, "team_role": 31, "team_schedule_channel": 40}
    ]
  },
  "2": {
    "SetupComplete": true,
    "teams": [
      {"team_name": "Ghosts", "team_cap_role": "abc", "team_role": 51, "team_schedule_channel": null, "note": "keep"}
    ]
  }
}"#;
    std::fs::write(dir.path().join("servers.json"), servers).unwrap();
    let (config, _) = open_stores(dir.path()).await.unwrap();

    let document = config.load().await.unwrap();
    assert_eq!(document.community("1").unwrap().teams[0].team_name, "Falcons");
    let broken = document.community("2").unwrap();
    assert!(broken.teams.is_empty());
    assert_eq!(broken.unreadable_teams.len(), 1);

    config.save(&document).await.unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("servers.json")).unwrap()).unwrap();
    assert_eq!(raw["2"]["teams"][0]["team_cap_role"], "abc");
    assert_eq!(raw["2"]["teams"][0]["note"], "keep");
    assert_eq!(config.load().await.unwrap(), document);
}

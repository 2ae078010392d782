#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use teamsync_core::clock::ManualClock;
use teamsync_core::models::community::{CommunityConfig, ConfigDocument, NewTeam, Team};
use teamsync_core::ports::{Actor, Emitter};
use teamsync_db::mock::{InMemoryConfigStore, InMemoryEventStore};
use teamsync_engine::testing::{MemoryAuditLog, RecordingEmitter};
use teamsync_engine::SyncContext;

pub const COMMUNITY: &str = "100";
pub const ADMIN_ROLE: u64 = 900;

pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub config: Arc<InMemoryConfigStore>,
    pub events: Arc<InMemoryEventStore>,
    pub emitter: Arc<RecordingEmitter>,
    pub audit: Arc<MemoryAuditLog>,
    pub ctx: Arc<SyncContext>,
}

impl TestContext {
    pub fn new(document: ConfigDocument, now: DateTime<Utc>) -> Self {
        Self::with_emitter(document, now, Arc::new(RecordingEmitter::new()))
    }

    pub fn with_emitter(
        document: ConfigDocument,
        now: DateTime<Utc>,
        emitter: Arc<RecordingEmitter>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let config = Arc::new(InMemoryConfigStore::new(document));
        let events = Arc::new(InMemoryEventStore::new());
        let audit = Arc::new(MemoryAuditLog::new());
        let ctx = Arc::new(SyncContext::new(
            clock.clone(),
            config.clone(),
            events.clone(),
            emitter.clone(),
            audit.clone(),
        ));

        Self {
            clock,
            config,
            events,
            emitter,
            audit,
            ctx,
        }
    }

    /// Context whose emitter is not a `RecordingEmitter`.
    pub fn with_custom_emitter(
        document: ConfigDocument,
        now: DateTime<Utc>,
        emitter: Arc<dyn Emitter>,
        io_timeout: std::time::Duration,
    ) -> (Arc<SyncContext>, Arc<InMemoryConfigStore>) {
        let config = Arc::new(InMemoryConfigStore::new(document));
        let ctx = SyncContext::new(
            Arc::new(ManualClock::new(now)),
            config.clone(),
            Arc::new(InMemoryEventStore::new()),
            emitter,
            Arc::new(MemoryAuditLog::new()),
        )
        .with_io_timeout(io_timeout);
        (Arc::new(ctx), config)
    }

    pub fn community(&self) -> CommunityConfig {
        self.config
            .snapshot()
            .community(COMMUNITY)
            .cloned()
            .expect("community present")
    }

    pub fn team_named(&self, name: &str) -> Team {
        self.community()
            .team_by_name(name)
            .cloned()
            .expect("team present")
    }
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Monday 2024-05-06 at 12:00 UTC.
pub fn monday_noon_utc() -> DateTime<Utc> {
    utc(2024, 5, 6, 12, 0)
}

pub fn team(name: &str, channel: u64, timezone: &str) -> Team {
    Team::from_request(
        NewTeam {
            team_name: name.to_string(),
            game: "Valorant".to_string(),
            team_cap_role: channel + 1,
            team_role: Some(channel + 2),
            team_schedule_channel: channel,
            timezone: timezone.to_string(),
        },
        "2024-01-01T00:00:00+00:00".to_string(),
    )
}

pub fn community_with(teams: Vec<Team>) -> CommunityConfig {
    CommunityConfig {
        setup_complete: true,
        teams,
        admin_roles: vec![ADMIN_ROLE],
        bot_channels: vec![1],
        ..CommunityConfig::default()
    }
}

pub fn document_with(teams: Vec<Team>) -> ConfigDocument {
    let mut document = ConfigDocument::default();
    document
        .communities
        .insert(COMMUNITY.to_string(), community_with(teams));
    document
}

pub fn admin() -> Actor {
    Actor {
        user_id: 1,
        display_name: "alice".to_string(),
        role_ids: vec![5, ADMIN_ROLE],
        server_admin: false,
    }
}

pub fn member() -> Actor {
    Actor {
        user_id: 2,
        display_name: "bob".to_string(),
        role_ids: vec![5],
        server_admin: false,
    }
}

pub fn server_owner() -> Actor {
    Actor {
        user_id: 3,
        display_name: "carol".to_string(),
        role_ids: vec![],
        server_admin: true,
    }
}

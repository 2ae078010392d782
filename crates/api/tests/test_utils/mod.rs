#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use teamsync_api::{build_router, config::ApiConfig, ApiState};
use teamsync_core::clock::ManualClock;
use teamsync_core::models::community::{CommunityConfig, ConfigDocument, NewTeam, Team};
use teamsync_db::mock::{InMemoryConfigStore, InMemoryEventStore};
use teamsync_engine::testing::{MemoryAuditLog, RecordingEmitter};
use teamsync_engine::{EngineStatus, SyncContext};
use tokio::sync::RwLock;
use tower::ServiceExt;

pub const COMMUNITY: &str = "100";

pub struct TestContext {
    pub config: Arc<InMemoryConfigStore>,
    pub events: Arc<InMemoryEventStore>,
    pub state: Arc<ApiState>,
}

impl TestContext {
    pub fn new(document: ConfigDocument) -> Self {
        let config = Arc::new(InMemoryConfigStore::new(document));
        let events = Arc::new(InMemoryEventStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap(),
        ));
        let ctx = Arc::new(SyncContext::new(
            clock,
            config.clone(),
            events.clone(),
            Arc::new(RecordingEmitter::new()),
            Arc::new(MemoryAuditLog::new()),
        ));
        let state = Arc::new(ApiState {
            ctx,
            status: Arc::new(RwLock::new(EngineStatus::default())),
        });

        Self {
            config,
            events,
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &ApiConfig::default()).unwrap()
    }

    /// Issue a GET against a fresh router and decode the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn team(name: &str, channel: u64, timezone: &str) -> Team {
    Team::from_request(
        NewTeam {
            team_name: name.to_string(),
            game: "Valorant".to_string(),
            team_cap_role: channel + 1,
            team_role: None,
            team_schedule_channel: channel,
            timezone: timezone.to_string(),
        },
        "2024-01-01T00:00:00+00:00".to_string(),
    )
}

pub fn document_with(setup_complete: bool, teams: Vec<Team>) -> ConfigDocument {
    let mut document = ConfigDocument::default();
    document.communities.insert(
        COMMUNITY.to_string(),
        CommunityConfig {
            setup_complete,
            teams,
            ..CommunityConfig::default()
        },
    );
    document
}

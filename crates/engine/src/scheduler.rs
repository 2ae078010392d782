//! Weekly scheduling prompts.
//!
//! A background loop ticks on a fixed interval. Each tick walks every team of
//! every set-up community, evaluates the trigger in the team's own zone and posts
//! one RSVP prompt per team and zone-local day, guarded by the `last_synced`
//! watermark.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use serde::Serialize;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::community::{Team, UnreadableTeam};
use teamsync_core::models::event::EventRecord;
use teamsync_core::models::MessageId;
use teamsync_core::{render, timezone};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::context::SyncContext;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Zone-local weekday and minute at which a team's weekly prompt is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncTrigger {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl Default for SyncTrigger {
    fn default() -> Self {
        Self {
            weekday: Weekday::Mon,
            hour: 12,
            minute: 0,
        }
    }
}

impl SyncTrigger {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> SyncResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(SyncError::Validation(format!(
                "invalid trigger time {hour:02}:{minute:02}"
            )));
        }
        Ok(Self {
            weekday,
            hour,
            minute,
        })
    }

    /// Exact-minute match. A tick that lands on another minute misses the window.
    pub fn matches<Tz: TimeZone>(&self, local: &DateTime<Tz>) -> bool {
        local.weekday() == self.weekday && local.hour() == self.hour && local.minute() == self.minute
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassMode {
    /// Only teams inside the trigger window.
    Scheduled,
    /// Every team not yet synced today.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedPrompt {
    pub community_id: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub message_id: MessageId,
    pub local_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPrompt {
    pub community_id: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub reason: String,
}

/// What one pass over the configuration did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub emitted: Vec<EmittedPrompt>,
    pub failed: Vec<FailedPrompt>,
    /// Teams skipped because today's prompt already went out.
    pub already_synced: usize,
    /// Whether the configuration document was written.
    pub saved: bool,
}

/// Snapshot of the loop, shared with the status API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub running: bool,
    pub ticks: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_emitted: usize,
    pub last_failed: usize,
    pub total_emitted: u64,
    pub last_error: Option<String>,
}

pub type StatusHandle = Arc<RwLock<EngineStatus>>;

pub struct SchedulingEngine {
    ctx: Arc<SyncContext>,
    trigger: SyncTrigger,
    tick_interval: Duration,
    status: StatusHandle,
}

impl SchedulingEngine {
    pub fn new(ctx: Arc<SyncContext>, trigger: SyncTrigger) -> Self {
        Self {
            ctx,
            trigger,
            tick_interval: DEFAULT_TICK_INTERVAL,
            status: Arc::new(RwLock::new(EngineStatus::default())),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn trigger(&self) -> SyncTrigger {
        self.trigger
    }

    pub fn status(&self) -> StatusHandle {
        Arc::clone(&self.status)
    }

    /// One scheduled pass. Only teams whose local time matches the trigger are prompted.
    pub async fn tick(&self) -> SyncResult<TickReport> {
        let result = self.run_pass(PassMode::Scheduled).await;
        self.record(&result).await;
        result
    }

    /// Prompt every team that has not been prompted today, regardless of the trigger window.
    pub async fn sync_now(&self) -> SyncResult<TickReport> {
        info!("Manual sync requested");
        let result = self.run_pass(PassMode::Manual).await;
        self.record(&result).await;
        result
    }

    /// Start the background loop. Sending `true` on `shutdown` stops it once the
    /// tick in progress, if any, has finished.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Scheduling engine started (every {:?}, trigger {:?} {:02}:{:02})",
                self.tick_interval, self.trigger.weekday, self.trigger.hour, self.trigger.minute
            );
            self.status.write().await.running = true;

            let mut interval = tokio::time::interval(self.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = self.tick().await {
                            error!("Scheduling tick failed: {}", e);
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            self.status.write().await.running = false;
            info!("Scheduling engine stopped");
        })
    }

    async fn record(&self, result: &SyncResult<TickReport>) {
        let mut status = self.status.write().await;
        status.ticks += 1;
        status.last_tick_at = Some(self.ctx.now());
        match result {
            Ok(report) => {
                status.last_emitted = report.emitted.len();
                status.last_failed = report.failed.len();
                status.total_emitted += report.emitted.len() as u64;
                status.last_error = None;
            }
            Err(e) => {
                status.last_emitted = 0;
                status.last_failed = 0;
                status.last_error = Some(e.to_string());
            }
        }
    }

    async fn run_pass(&self, mode: PassMode) -> SyncResult<TickReport> {
        let _guard = self.ctx.lock_documents().await;
        let now = self.ctx.now();
        let mut document = self.ctx.load_config().await?;
        let mut report = TickReport::default();

        for (community_id, community) in document.communities.iter_mut() {
            if !community.setup_complete {
                continue;
            }

            let mut new_events = Vec::new();
            for team in community.teams.iter_mut() {
                let zone = timezone::resolve(&team.timezone);
                let local = now.with_timezone(&zone);
                let today = local.date_naive();

                if team.last_synced == Some(today) {
                    report.already_synced += 1;
                    continue;
                }
                if mode == PassMode::Scheduled && !self.trigger.matches(&local) {
                    continue;
                }

                match self.emit_prompt(team, &local).await {
                    Ok((message_id, record)) => {
                        info!(
                            "Posted weekly prompt {} for team '{}' in community {}",
                            message_id, team.team_name, community_id
                        );
                        team.last_synced = Some(today);
                        report.emitted.push(EmittedPrompt {
                            community_id: community_id.clone(),
                            team_id: team.team_id,
                            team_name: team.team_name.clone(),
                            message_id,
                            local_date: today,
                        });
                        new_events.push((message_id, record));
                    }
                    Err(e) => {
                        warn!(
                            "Could not post weekly prompt for team '{}' in community {}: {}",
                            team.team_name, community_id, e
                        );
                        report.failed.push(FailedPrompt {
                            community_id: community_id.clone(),
                            team_id: team.team_id,
                            team_name: team.team_name.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            for entry in &community.unreadable_teams {
                let unreadable = UnreadableTeam(entry);
                let local = now.with_timezone(&timezone::resolve(unreadable.timezone()));
                if mode == PassMode::Scheduled && !self.trigger.matches(&local) {
                    continue;
                }
                warn!(
                    "Skipping weekly prompt for unreadable team '{}' in community {}",
                    unreadable.name(),
                    community_id
                );
                report.failed.push(FailedPrompt {
                    community_id: community_id.clone(),
                    team_id: unreadable.team_id(),
                    team_name: unreadable.name().to_string(),
                    reason: "team entry is malformed".to_string(),
                });
            }

            if !new_events.is_empty() {
                self.store_events(community_id, new_events).await;
            }
        }

        if !report.emitted.is_empty() {
            self.ctx.save_config(&document).await?;
            report.saved = true;
        }

        debug!(
            "Tick finished: {} emitted, {} failed, {} already synced",
            report.emitted.len(),
            report.failed.len(),
            report.already_synced
        );
        Ok(report)
    }

    async fn emit_prompt<Tz: TimeZone>(
        &self,
        team: &Team,
        local: &DateTime<Tz>,
    ) -> SyncResult<(MessageId, EventRecord)>
    where
        Tz::Offset: std::fmt::Display,
    {
        let channel_id = team.team_schedule_channel;
        if !self.ctx.channel_available(channel_id).await? {
            return Err(SyncError::ChannelUnavailable(channel_id));
        }

        let record = EventRecord::new(
            render::weekly_event_name(local),
            team.team_name.clone(),
            Some(team.team_id),
            channel_id,
            local.fixed_offset(),
        )
        .with_ping(team.team_role);
        let message = render::event_message(&record, record.ping_role);
        let message_id = self.ctx.send(channel_id, &message).await?;

        Ok((message_id, record))
    }

    /// The prompts already exist at this point, so a failure here is only logged.
    /// RSVPs against them recreate the records on demand.
    async fn store_events(&self, community_id: &str, new_events: Vec<(MessageId, EventRecord)>) {
        let mut book = match self.ctx.load_events(community_id).await {
            Ok(book) => book,
            Err(e) => {
                error!(
                    "Could not load events of community {} to record {} new prompts: {}",
                    community_id,
                    new_events.len(),
                    e
                );
                return;
            }
        };

        for (message_id, record) in new_events {
            book.insert(message_id, record);
        }

        if let Err(e) = self.ctx.save_events(community_id, &book).await {
            error!(
                "Could not save events of community {}: {}",
                community_id, e
            );
        }
    }
}

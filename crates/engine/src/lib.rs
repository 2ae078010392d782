//! Scheduling and RSVP engine: the periodic weekly-prompt loop plus the
//! request/response operations the Discord front end and the status API call.

pub mod admin;
pub mod audit;
pub mod broadcast;
pub mod context;
pub mod intake;
pub mod planner;
pub mod scheduler;
pub mod testing;

pub use context::SyncContext;
pub use scheduler::{EngineStatus, SchedulingEngine, StatusHandle, SyncTrigger, TickReport};

//! # TeamSync core
//!
//! Domain types shared by every TeamSync crate: the per-community configuration
//! document, scheduling events with their RSVP ledger, the timezone resolver,
//! message rendering, and the collaborator traits the engine is written against.

pub mod clock;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod ports;
pub mod render;
pub mod timezone;

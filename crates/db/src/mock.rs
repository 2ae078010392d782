//! Test doubles for the stores: mockall mocks for expectation-style tests and
//! in-memory stores for tests that drive whole flows.

pub mod memory;
pub mod repositories;

pub use memory::{InMemoryConfigStore, InMemoryEventStore};
pub use repositories::{MockConfigRepo, MockEventRepo};

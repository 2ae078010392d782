use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::community::ConfigDocument;
use teamsync_core::models::event::EventBook;
use teamsync_core::ports::{ConfigStore, EventStore};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Configuration document held in memory, with a save counter and a switch to make saves fail.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    document: Mutex<ConfigDocument>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryConfigStore {
    pub fn new(document: ConfigDocument) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    /// The document as last saved.
    pub fn snapshot(&self) -> ConfigDocument {
        lock(&self.document).clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load(&self) -> SyncResult<ConfigDocument> {
        Ok(self.snapshot())
    }

    async fn save(&self, document: &ConfigDocument) -> SyncResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SyncError::PersistenceWriteFailure(
                "configured to fail".to_string(),
            ));
        }
        *lock(&self.document) = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Event documents held in memory, keyed by community id.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    books: Mutex<HashMap<String, EventBook>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self, community_id: &str) -> EventBook {
        lock(&self.books)
            .get(community_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn put(&self, community_id: &str, book: EventBook) {
        lock(&self.books).insert(community_id.to_string(), book);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load_events(&self, community_id: &str) -> SyncResult<EventBook> {
        Ok(self.book(community_id))
    }

    async fn save_events(&self, community_id: &str, book: &EventBook) -> SyncResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SyncError::PersistenceWriteFailure(
                "configured to fail".to_string(),
            ));
        }
        self.put(community_id, book.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

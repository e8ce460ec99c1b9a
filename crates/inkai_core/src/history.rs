//! Bounded story history.
//!
//! The whole collection lives in a single key-value slot as a JSON array,
//! newest first. Every mutation reads the array, changes it and writes the
//! whole array back. Those read-modify-write cycles are serialized through
//! one mutex per store so concurrent callers cannot lose updates.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::model::{RecordId, StoryRecord};
use crate::store::KeyValueStore;

/// Slot key holding the serialized history.
pub const HISTORY_KEY: &str = "INK_AI_STORY_HISTORY";

/// Default number of stories kept.
pub const MAX_HISTORY: usize = 50;

/// Write side of the history used by the generation pipeline.
pub trait HistoryRepository: Send + Sync {
    /// Insert a record at the head, evicting the oldest past capacity.
    fn append(&self, record: StoryRecord) -> CoreResult<()>;
}

/// Recency-ordered, capacity-bounded story history.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(backend, MAX_HISTORY)
    }

    /// Create a store keeping at most `capacity` stories (minimum 1).
    pub fn with_capacity(backend: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            backend,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `record` as the newest entry and persist the trimmed collection.
    pub fn append(&self, record: StoryRecord) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut history = self.load()?;

        debug!("Appending story {} to history ({} stored)", record.id, history.len());
        history.insert(0, record);
        history.truncate(self.capacity);

        self.save(&history)
    }

    /// All stored stories, newest first.
    ///
    /// Never fails: a missing, unreadable or corrupt slot reads as empty.
    pub fn list(&self) -> Vec<StoryRecord> {
        match self.try_list() {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to read story history, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Like [`list`](Self::list) but reports read failures.
    pub fn try_list(&self) -> CoreResult<Vec<StoryRecord>> {
        self.load()
    }

    /// Look up one story by id.
    pub fn get(&self, id: RecordId) -> Option<StoryRecord> {
        self.list().into_iter().find(|record| record.id == id)
    }

    /// Highest id currently stored.
    pub fn max_id(&self) -> Option<RecordId> {
        self.list().iter().map(|record| record.id).max()
    }

    /// Remove every story with `id`. Removing an absent id changes nothing.
    pub fn remove(&self, id: RecordId) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut history = self.load()?;

        let before = history.len();
        history.retain(|record| record.id != id);
        if history.len() == before {
            debug!("Story {} not in history, nothing to remove", id);
            return Ok(());
        }

        self.save(&history)
    }

    /// Drop the persisted collection entirely.
    pub fn clear(&self) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        self.backend.remove(HISTORY_KEY)
    }

    fn load(&self) -> CoreResult<Vec<StoryRecord>> {
        let Some(content) = self.backend.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&content).map_err(|e| CoreError::PersistenceRead {
            key: HISTORY_KEY.to_string(),
            message: e.to_string(),
        })
    }

    fn save(&self, history: &[StoryRecord]) -> CoreResult<()> {
        let content = serde_json::to_string(history)?;
        self.backend.set(HISTORY_KEY, &content)
    }
}

impl HistoryRepository for HistoryStore {
    fn append(&self, record: StoryRecord) -> CoreResult<()> {
        HistoryStore::append(self, record)
    }
}

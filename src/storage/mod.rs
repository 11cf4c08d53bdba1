//! Storage layer abstraction.
//!
//! Two collaborator stores back the pipeline:
//! - **Entry store**: classified entries, queried by review status
//! - **Roadmap store**: one roadmap document per user, upsert semantics
//!
//! Both have an in-memory backend (tests, ephemeral runs) and a `SQLite`
//! backend (the default for the CLI). Attach idempotence is enforced by
//! the roadmap itself before save; the whole document is written under a
//! single store call.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryEntryStore, MemoryRoadmapStore};
pub use sqlite::SqliteStore;

use crate::Result;
use crate::models::{Entry, EntryId, EntryStatus, Roadmap, StatusCounts};

/// Persistence for classified entries.
pub trait EntryStore: Send + Sync {
    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if an entry with the same
    /// `(url, visited_at)` already exists.
    fn insert(&self, entry: &Entry) -> Result<()>;

    /// Retrieves an entry by id.
    fn get(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// Persists changes to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the entry does not exist.
    fn update(&self, entry: &Entry) -> Result<()>;

    /// Lists entries, newest visit first, optionally filtered by status.
    fn list(&self, status: Option<EntryStatus>, limit: usize) -> Result<Vec<Entry>>;

    /// Deletes an entry, returning whether it existed.
    fn delete(&self, id: &EntryId) -> Result<bool>;

    /// Counts entries grouped by review status.
    fn count_by_status(&self) -> Result<StatusCounts>;
}

/// Persistence for per-user roadmap documents.
pub trait RoadmapStore: Send + Sync {
    /// Loads a user's roadmap, if one has been saved.
    fn load(&self, user_id: &str) -> Result<Option<Roadmap>>;

    /// Saves a user's roadmap (insert or replace).
    fn save(&self, user_id: &str, roadmap: &Roadmap) -> Result<()>;
}

// Shared-ownership forwarding, so one backend can serve both roles.

impl<T: EntryStore + ?Sized> EntryStore for std::sync::Arc<T> {
    fn insert(&self, entry: &Entry) -> Result<()> {
        (**self).insert(entry)
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        (**self).get(id)
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        (**self).update(entry)
    }

    fn list(&self, status: Option<EntryStatus>, limit: usize) -> Result<Vec<Entry>> {
        (**self).list(status, limit)
    }

    fn delete(&self, id: &EntryId) -> Result<bool> {
        (**self).delete(id)
    }

    fn count_by_status(&self) -> Result<StatusCounts> {
        (**self).count_by_status()
    }
}

impl<T: RoadmapStore + ?Sized> RoadmapStore for std::sync::Arc<T> {
    fn load(&self, user_id: &str) -> Result<Option<Roadmap>> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, roadmap: &Roadmap) -> Result<()> {
        (**self).save(user_id, roadmap)
    }
}

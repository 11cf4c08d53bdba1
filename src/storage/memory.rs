//! In-memory store backends.
//!
//! Used by tests and ephemeral runs. State lives in `RwLock`-guarded maps
//! and is lost when the process exits.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{EntryStore, RoadmapStore};
use crate::models::{Entry, EntryId, EntryStatus, Roadmap, StatusCounts};
use crate::{Error, Result};

fn lock_err(operation: &str) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: "lock poisoned".to_string(),
    }
}

/// In-memory entry store.
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: RwLock<HashMap<EntryId, Entry>>,
}

impl MemoryEntryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(&self, entry: &Entry) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_err("insert_entry"))?;
        let duplicate = guard
            .values()
            .any(|e| e.url == entry.url && e.visited_at == entry.visited_at);
        if duplicate {
            return Err(Error::InvalidInput(format!(
                "visit already recorded for {} at {}",
                entry.url, entry.visited_at
            )));
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        let guard = self.entries.read().map_err(|_| lock_err("get_entry"))?;
        Ok(guard.get(id).cloned())
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_err("update_entry"))?;
        if !guard.contains_key(&entry.id) {
            return Err(Error::NotFound {
                kind: "entry".to_string(),
                id: entry.id.to_string(),
            });
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    fn list(&self, status: Option<EntryStatus>, limit: usize) -> Result<Vec<Entry>> {
        let guard = self.entries.read().map_err(|_| lock_err("list_entries"))?;
        let mut entries: Vec<Entry> = guard
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
        entries.truncate(limit);
        Ok(entries)
    }

    fn delete(&self, id: &EntryId) -> Result<bool> {
        let mut guard = self.entries.write().map_err(|_| lock_err("delete_entry"))?;
        Ok(guard.remove(id).is_some())
    }

    fn count_by_status(&self) -> Result<StatusCounts> {
        let guard = self.entries.read().map_err(|_| lock_err("count_entries"))?;
        let mut counts = StatusCounts::default();
        for entry in guard.values() {
            match entry.status {
                EntryStatus::Pending => counts.pending += 1,
                EntryStatus::Approved => counts.approved += 1,
                EntryStatus::Rejected => counts.rejected += 1,
            }
        }
        Ok(counts)
    }
}

/// In-memory roadmap store.
#[derive(Default)]
pub struct MemoryRoadmapStore {
    documents: RwLock<HashMap<String, Roadmap>>,
}

impl MemoryRoadmapStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoadmapStore for MemoryRoadmapStore {
    fn load(&self, user_id: &str) -> Result<Option<Roadmap>> {
        let guard = self.documents.read().map_err(|_| lock_err("load_roadmap"))?;
        Ok(guard.get(user_id).cloned())
    }

    fn save(&self, user_id: &str, roadmap: &Roadmap) -> Result<()> {
        let mut guard = self
            .documents
            .write()
            .map_err(|_| lock_err("save_roadmap"))?;
        guard.insert(user_id.to_string(), roadmap.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::EntrySource;
    use chrono::{Duration, Utc};

    fn test_entry(id: &str, url: &str) -> Entry {
        let now = Utc::now();
        Entry {
            id: EntryId::new(id),
            url: url.to_string(),
            title: "Title".to_string(),
            visited_at: now,
            visit_seconds: 0,
            tags: Vec::new(),
            keywords: Vec::new(),
            primary_topic: "General".to_string(),
            confidence: 50,
            is_video: false,
            video_seconds: 0,
            watched_seconds: 0,
            status: EntryStatus::Pending,
            source: EntrySource::Extension,
            summary: None,
            notes: None,
            created_at: now,
            updated_at: now,
            approved_at: None,
            cross_referenced_at: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = MemoryEntryStore::new();
        let entry = test_entry("e1", "https://example.org/a");
        store.insert(&entry).unwrap();

        let found = store.get(&EntryId::new("e1")).unwrap().unwrap();
        assert_eq!(found.url, "https://example.org/a");
        assert!(store.get(&EntryId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_visit_rejected() {
        let store = MemoryEntryStore::new();
        let entry = test_entry("e1", "https://example.org/a");
        store.insert(&entry).unwrap();

        let mut dup = entry.clone();
        dup.id = EntryId::new("e2");
        let err = store.insert(&dup).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_update_missing_entry_errors() {
        let store = MemoryEntryStore::new();
        let entry = test_entry("e1", "https://example.org/a");
        assert!(matches!(
            store.update(&entry),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let store = MemoryEntryStore::new();
        let mut older = test_entry("e1", "https://example.org/a");
        older.visited_at = Utc::now() - Duration::hours(2);
        let mut newer = test_entry("e2", "https://example.org/b");
        newer.status = EntryStatus::Approved;
        store.insert(&older).unwrap();
        store.insert(&newer).unwrap();

        let all = store.list(None, 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, EntryId::new("e2")); // newest first

        let pending = store.list(Some(EntryStatus::Pending), 10).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, EntryId::new("e1"));
    }

    #[test]
    fn test_delete() {
        let store = MemoryEntryStore::new();
        store
            .insert(&test_entry("e1", "https://example.org/a"))
            .unwrap();
        assert!(store.delete(&EntryId::new("e1")).unwrap());
        assert!(!store.delete(&EntryId::new("e1")).unwrap());
    }

    #[test]
    fn test_count_by_status() {
        let store = MemoryEntryStore::new();
        let mut approved = test_entry("e1", "https://example.org/a");
        approved.status = EntryStatus::Approved;
        store.insert(&approved).unwrap();
        store
            .insert(&test_entry("e2", "https://example.org/b"))
            .unwrap();

        let counts = store.count_by_status().unwrap();
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_roadmap_round_trip() {
        let store = MemoryRoadmapStore::new();
        assert!(store.load("default").unwrap().is_none());

        let catalog = Catalog::builtin().unwrap();
        let roadmap = Roadmap::seed(&catalog);
        store.save("default", &roadmap).unwrap();

        let loaded = store.load("default").unwrap().unwrap();
        assert_eq!(loaded.topics.len(), roadmap.topics.len());
    }
}

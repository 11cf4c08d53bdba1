//! Entry review service.
//!
//! Handles the approve/reject lifecycle. Approval re-scores the entry
//! (approved status is worth +20 over the pending-time score), then
//! cross-references it against the catalog and attaches it into the
//! user's roadmap.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::crossref::{CrossReference, cross_reference};
use crate::models::{Entry, EntryId, EntryStatus, Roadmap, StatusCounts, TopicStatus};
use crate::scoring;
use crate::storage::{EntryStore, RoadmapStore};
use crate::{Error, Result};

/// Per-entry failure inside a batch operation.
#[derive(Debug, Clone, Serialize)]
pub struct EntryError {
    /// The entry the failure applies to.
    pub entry_id: EntryId,
    /// Human-readable cause.
    pub message: String,
}

/// Report of a batch approve/reject operation.
///
/// Per-entry failures (unknown id, already in the target status) are
/// recorded here instead of aborting the rest of the batch.
#[derive(Debug, Default, Serialize)]
pub struct ApproveReport {
    /// Ids that were transitioned.
    pub processed: Vec<EntryId>,
    /// Ids that were skipped, with the reason.
    pub errors: Vec<EntryError>,
}

/// One topic's progress line in a stats report.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    /// Topic id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Recency-weighted progress.
    pub progress: u8,
    /// Progress status.
    pub status: TopicStatus,
    /// Number of attached entries.
    pub entries: usize,
}

/// Entry counts and per-topic progress.
#[derive(Debug, Serialize)]
pub struct Stats {
    /// Entry counts by review status.
    pub counts: StatusCounts,
    /// Topic progress lines in roadmap order.
    pub topics: Vec<TopicSummary>,
}

/// Service for reviewing pending entries and maintaining the roadmap.
pub struct ReviewService<E, R> {
    entries: E,
    roadmaps: R,
    catalog: Arc<Catalog>,
    user_id: String,
}

impl<E: EntryStore, R: RoadmapStore> ReviewService<E, R> {
    /// Creates a review service for one user's roadmap.
    pub fn new(entries: E, roadmaps: R, catalog: Arc<Catalog>, user_id: impl Into<String>) -> Self {
        Self {
            entries,
            roadmaps,
            catalog,
            user_id: user_id.into(),
        }
    }

    /// Loads the user's roadmap, seeding it from the catalog on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn roadmap(&self) -> Result<Roadmap> {
        if let Some(roadmap) = self.roadmaps.load(&self.user_id)? {
            return Ok(roadmap);
        }
        let roadmap = Roadmap::seed(&self.catalog);
        self.roadmaps.save(&self.user_id, &roadmap)?;
        tracing::info!(user_id = %self.user_id, "Seeded roadmap from catalog");
        Ok(roadmap)
    }

    /// Approves a batch of entries.
    ///
    /// Each approved entry is re-scored, cross-referenced against the
    /// catalog, and attached into the roadmap (idempotently). Unknown ids
    /// and already-approved entries are reported per id; the rest of the
    /// batch proceeds.
    ///
    /// # Errors
    ///
    /// Returns an error only when the roadmap itself cannot be loaded or
    /// saved.
    pub fn approve(&self, ids: &[EntryId]) -> Result<ApproveReport> {
        let mut roadmap = self.roadmap()?;
        let mut report = ApproveReport::default();
        let now = Utc::now();

        for id in ids {
            match self.approve_one(&mut roadmap, id, now) {
                Ok(()) => report.processed.push(id.clone()),
                Err(e) => report.errors.push(EntryError {
                    entry_id: id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        self.roadmaps.save(&self.user_id, &roadmap)?;
        Ok(report)
    }

    fn approve_one(
        &self,
        roadmap: &mut Roadmap,
        id: &EntryId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut entry = self.entries.get(id)?.ok_or_else(|| Error::NotFound {
            kind: "entry".to_string(),
            id: id.to_string(),
        })?;

        if entry.status == EntryStatus::Approved {
            return Err(Error::InvalidInput("entry already approved".to_string()));
        }

        entry.status = EntryStatus::Approved;
        entry.approved_at = Some(now);
        entry.updated_at = now;
        entry.confidence = scoring::confidence(&entry);

        if let Some(matched) = cross_reference(&entry, &self.catalog) {
            roadmap.attach(&entry, &matched, now)?;
            entry.cross_referenced_at = Some(now);
        }

        self.entries.update(&entry)?;
        tracing::info!(entry_id = %entry.id, confidence = entry.confidence, "Approved entry");
        Ok(())
    }

    /// Rejects a batch of entries.
    ///
    /// # Errors
    ///
    /// Never fails as a batch; per-entry problems are reported in the
    /// result.
    pub fn reject(&self, ids: &[EntryId]) -> Result<ApproveReport> {
        let mut report = ApproveReport::default();
        let now = Utc::now();

        for id in ids {
            match self.reject_one(id, now) {
                Ok(()) => report.processed.push(id.clone()),
                Err(e) => report.errors.push(EntryError {
                    entry_id: id.clone(),
                    message: e.to_string(),
                }),
            }
        }
        Ok(report)
    }

    fn reject_one(&self, id: &EntryId, now: DateTime<Utc>) -> Result<()> {
        let mut entry = self.entries.get(id)?.ok_or_else(|| Error::NotFound {
            kind: "entry".to_string(),
            id: id.to_string(),
        })?;

        if entry.status == EntryStatus::Rejected {
            return Err(Error::InvalidInput("entry already rejected".to_string()));
        }

        entry.status = EntryStatus::Rejected;
        entry.updated_at = now;
        self.entries.update(&entry)?;
        tracing::info!(entry_id = %entry.id, "Rejected entry");
        Ok(())
    }

    /// Re-runs cross-referencing for one entry.
    ///
    /// Returns the match that was applied, or `None` when the matcher
    /// discarded its candidate (no topic assigned).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry does not exist.
    pub fn cross_reference_entry(&self, id: &EntryId) -> Result<Option<CrossReference>> {
        let mut entry = self.entries.get(id)?.ok_or_else(|| Error::NotFound {
            kind: "entry".to_string(),
            id: id.to_string(),
        })?;

        let Some(matched) = cross_reference(&entry, &self.catalog) else {
            return Ok(None);
        };

        let now = Utc::now();
        let mut roadmap = self.roadmap()?;
        roadmap.attach(&entry, &matched, now)?;
        self.roadmaps.save(&self.user_id, &roadmap)?;

        entry.cross_referenced_at = Some(now);
        entry.updated_at = now;
        self.entries.update(&entry)?;

        Ok(Some(matched))
    }

    /// Marks a roadmap topic as completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the topic is not in the roadmap.
    pub fn complete_topic(&self, topic_id: &str) -> Result<()> {
        let mut roadmap = self.roadmap()?;
        roadmap.complete_topic(topic_id)?;
        self.roadmaps.save(&self.user_id, &roadmap)
    }

    /// Builds a stats report with progress recomputed as of now.
    ///
    /// # Errors
    ///
    /// Returns an error if a store fails.
    pub fn stats(&self) -> Result<Stats> {
        let counts = self.entries.count_by_status()?;
        let mut roadmap = self.roadmap()?;
        roadmap.refresh_progress_at(Utc::now());

        let topics = roadmap
            .topics
            .iter()
            .map(|t| TopicSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                progress: t.progress,
                status: t.status,
                entries: t.entries.len(),
            })
            .collect();

        Ok(Stats { counts, topics })
    }

    /// Lists entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn list(&self, status: Option<EntryStatus>, limit: usize) -> Result<Vec<Entry>> {
        self.entries.list(status, limit)
    }

    /// The roadmap refreshed as of now, for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn roadmap_view(&self) -> Result<Roadmap> {
        let mut roadmap = self.roadmap()?;
        roadmap.refresh_progress_at(Utc::now());
        Ok(roadmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntrySource;
    use crate::storage::{MemoryEntryStore, MemoryRoadmapStore};

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json(
                r#"{
                    "id": "c", "name": "Test",
                    "topics": [
                        {"id": "react", "name": "React", "subtopics": [
                            {"id": "react-hooks", "name": "React Hooks"}
                        ]},
                        {"id": "docker", "name": "Docker", "subtopics": []}
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    fn service() -> ReviewService<MemoryEntryStore, MemoryRoadmapStore> {
        ReviewService::new(
            MemoryEntryStore::new(),
            MemoryRoadmapStore::new(),
            catalog(),
            "default",
        )
    }

    fn pending_entry(id: &str, title: &str) -> Entry {
        let now = Utc::now();
        Entry {
            id: EntryId::new(id),
            url: format!("https://example.org/{id}"),
            title: title.to_string(),
            visited_at: now,
            visit_seconds: 0,
            tags: vec!["tutorial".to_string()],
            keywords: Vec::new(),
            primary_topic: "Programming".to_string(),
            confidence: 75,
            is_video: false,
            video_seconds: 0,
            watched_seconds: 0,
            status: EntryStatus::Pending,
            source: EntrySource::Extension,
            summary: Some("Learning content about programming.".to_string()),
            notes: None,
            created_at: now,
            updated_at: now,
            approved_at: None,
            cross_referenced_at: None,
        }
    }

    #[test]
    fn test_roadmap_seeded_on_first_use() {
        let service = service();
        let roadmap = service.roadmap().unwrap();
        // Two catalog topics plus the catch-all
        assert_eq!(roadmap.topics.len(), 3);
    }

    #[test]
    fn test_approve_scores_matches_and_attaches() {
        let service = service();
        let entry = pending_entry("e1", "React Hooks");
        service.entries.insert(&entry).unwrap();

        let report = service.approve(&[EntryId::new("e1")]).unwrap();
        assert_eq!(report.processed.len(), 1);
        assert!(report.errors.is_empty());

        let approved = service.entries.get(&EntryId::new("e1")).unwrap().unwrap();
        assert_eq!(approved.status, EntryStatus::Approved);
        assert!(approved.approved_at.is_some());
        assert!(approved.cross_referenced_at.is_some());
        // Approval adds +20 over the pending-time score
        assert!(approved.confidence > 75);

        let roadmap = service.roadmap().unwrap();
        let topic = roadmap.topic("react").unwrap();
        assert_eq!(topic.entries.len(), 1);
    }

    #[test]
    fn test_approve_twice_reports_error_and_stays_idempotent() {
        let service = service();
        let entry = pending_entry("e1", "React Hooks");
        service.entries.insert(&entry).unwrap();

        let first = service.approve(&[EntryId::new("e1")]).unwrap();
        assert_eq!(first.processed.len(), 1);

        let second = service.approve(&[EntryId::new("e1")]).unwrap();
        assert!(second.processed.is_empty());
        assert_eq!(second.errors.len(), 1);
        assert!(second.errors[0].message.contains("already approved"));

        let roadmap = service.roadmap().unwrap();
        assert_eq!(roadmap.topic("react").unwrap().entries.len(), 1);
    }

    #[test]
    fn test_approve_missing_entry_continues_batch() {
        let service = service();
        let entry = pending_entry("e1", "Docker");
        service.entries.insert(&entry).unwrap();

        let report = service
            .approve(&[EntryId::new("missing"), EntryId::new("e1")])
            .unwrap();
        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("not found"));
    }

    #[test]
    fn test_unmatched_entry_lands_in_catch_all() {
        let service = service();
        let mut entry = pending_entry("e1", "Sourdough starter maintenance");
        entry.tags = Vec::new();
        service.entries.insert(&entry).unwrap();

        service.approve(&[EntryId::new("e1")]).unwrap();

        let roadmap = service.roadmap().unwrap();
        let misc = roadmap.topic(crate::catalog::MISC_TOPIC_ID).unwrap();
        assert_eq!(misc.entries.len(), 1);
        // Fallback attaches at full confidence
        assert!((misc.entries[0].confidence - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reject() {
        let service = service();
        let entry = pending_entry("e1", "React Hooks");
        service.entries.insert(&entry).unwrap();

        let report = service.reject(&[EntryId::new("e1")]).unwrap();
        assert_eq!(report.processed.len(), 1);

        let rejected = service.entries.get(&EntryId::new("e1")).unwrap().unwrap();
        assert_eq!(rejected.status, EntryStatus::Rejected);

        // Rejection never touches the roadmap
        let roadmap = service.roadmap().unwrap();
        assert!(roadmap.topics.iter().all(|t| t.entries.is_empty()));

        let again = service.reject(&[EntryId::new("e1")]).unwrap();
        assert_eq!(again.errors.len(), 1);
    }

    #[test]
    fn test_cross_reference_entry_reruns_idempotently() {
        let service = service();
        let entry = pending_entry("e1", "React Hooks");
        service.entries.insert(&entry).unwrap();
        service.approve(&[EntryId::new("e1")]).unwrap();

        let matched = service
            .cross_reference_entry(&EntryId::new("e1"))
            .unwrap()
            .unwrap();
        assert_eq!(matched.topic_id, "react");

        let roadmap = service.roadmap().unwrap();
        assert_eq!(roadmap.topic("react").unwrap().entries.len(), 1);
    }

    #[test]
    fn test_complete_topic_persists() {
        let service = service();
        service.complete_topic("docker").unwrap();

        let roadmap = service.roadmap().unwrap();
        let topic = roadmap.topic("docker").unwrap();
        assert_eq!(topic.status, TopicStatus::Completed);
        assert_eq!(topic.progress, 100);
    }

    #[test]
    fn test_stats() {
        let service = service();
        let entry = pending_entry("e1", "React Hooks");
        service.entries.insert(&entry).unwrap();
        service.approve(&[EntryId::new("e1")]).unwrap();

        let stats = service.stats().unwrap();
        assert_eq!(stats.counts.approved, 1);
        assert_eq!(stats.topics.len(), 3);
        let react = stats.topics.iter().find(|t| t.id == "react").unwrap();
        assert_eq!(react.entries, 1);
        assert!(react.progress > 0);
    }
}

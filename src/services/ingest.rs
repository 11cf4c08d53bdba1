//! Entry ingestion service.
//!
//! Takes raw visit candidates from the harvesting side, classifies them,
//! and persists learning content as pending entries. Non-learning
//! candidates are discarded, never persisted.

use chrono::{DateTime, Utc};

use crate::classify::Classifier;
use crate::models::{Entry, EntryId, EntrySource, EntryStatus};
use crate::scoring;
use crate::storage::EntryStore;
use crate::{Error, Result};

/// A raw visit candidate.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    /// Page title.
    pub title: String,
    /// Visited URL.
    pub url: String,
    /// Visit time; defaults to now.
    pub visited_at: Option<DateTime<Utc>>,
    /// Seconds spent on the page.
    pub visit_seconds: u32,
    /// Total video length in seconds, when known.
    pub video_seconds: u32,
    /// Watched length in seconds, when known.
    pub watched_seconds: u32,
    /// Where the candidate came from.
    pub source: EntrySource,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Outcome of submitting a visit candidate.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The candidate was learning content and was persisted as pending.
    Created(Box<Entry>),
    /// The candidate was not learning content and was not persisted.
    Discarded {
        /// Why the candidate was dropped.
        reason: String,
    },
}

/// Service for ingesting visit candidates.
pub struct IngestService<E> {
    classifier: Classifier,
    entries: E,
}

impl<E: EntryStore> IngestService<E> {
    /// Creates an ingest service with the given classifier cache
    /// capacity.
    #[must_use]
    pub fn new(entries: E, cache_capacity: usize) -> Self {
        Self {
            classifier: Classifier::new(cache_capacity),
            entries,
        }
    }

    /// Classifies and persists a visit candidate.
    ///
    /// Non-learning content (including excluded domains and URL paths) is
    /// discarded. Learning content is stored as a pending entry carrying
    /// the classifier's tags, keywords, topic, and summary, scored with
    /// the ingestion-time confidence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the title or URL is empty, or
    /// if the same `(url, visited_at)` was already submitted.
    pub fn submit(&self, request: SubmitRequest) -> Result<SubmitOutcome> {
        if request.title.trim().is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".to_string()));
        }
        if request.url.trim().is_empty() {
            return Err(Error::InvalidInput("url cannot be empty".to_string()));
        }

        let classification = self.classifier.classify(&request.title, &request.url);
        if !classification.is_learning_content {
            tracing::info!(
                url = %request.url,
                topic = %classification.primary_topic,
                "Discarding non-learning candidate"
            );
            metrics::counter!("ingest_total", "outcome" => "discarded").increment(1);
            return Ok(SubmitOutcome::Discarded {
                reason: format!("not learning content ({})", classification.primary_topic),
            });
        }

        let now = Utc::now();
        let mut entry = Entry {
            id: EntryId::generate(),
            url: request.url,
            title: request.title,
            visited_at: request.visited_at.unwrap_or(now),
            visit_seconds: request.visit_seconds,
            tags: classification.tags,
            keywords: classification.keywords,
            primary_topic: classification.primary_topic,
            confidence: 0,
            is_video: classification.is_video,
            video_seconds: request.video_seconds,
            watched_seconds: request.watched_seconds,
            status: EntryStatus::Pending,
            source: request.source,
            summary: Some(classification.summary),
            notes: request.notes,
            created_at: now,
            updated_at: now,
            approved_at: None,
            cross_referenced_at: None,
        };
        entry.confidence = scoring::confidence(&entry);

        self.entries.insert(&entry)?;

        tracing::info!(
            entry_id = %entry.id,
            topic = %entry.primary_topic,
            confidence = entry.confidence,
            "Created pending entry"
        );
        metrics::counter!("ingest_total", "outcome" => "created").increment(1);

        Ok(SubmitOutcome::Created(Box::new(entry)))
    }

    /// The store this service writes to.
    pub const fn entries(&self) -> &E {
        &self.entries
    }
}

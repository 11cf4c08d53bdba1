//! Live roadmap tree: catalog topics augmented with per-user progress.
//!
//! The roadmap is a materialized view: entries attached to a topic or
//! subtopic are denormalized snapshots (title/url/tags copied at attach
//! time), not live references. Edits to the source entry after attachment
//! do not propagate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entry, EntryId};
use crate::catalog::{Catalog, MISC_TOPIC_ID, MISC_TOPIC_NAME};
use crate::crossref::CrossReference;
use crate::scoring;
use crate::{Error, Result};

/// Progress status of a topic or subtopic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    /// Still being worked through.
    #[default]
    InProgress,
    /// Explicitly marked complete by the user.
    Completed,
}

impl TopicStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Denormalized snapshot of an entry attached to a topic or subtopic.
///
/// `confidence` is an `f64` because the snapshot is read back from
/// storage: the progress aggregator filters values that are not finite
/// numbers in `[0, 100]` instead of trusting the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRef {
    /// Id of the source entry.
    pub entry_id: EntryId,
    /// Match confidence recorded at attach time.
    pub confidence: f64,
    /// Title snapshot.
    pub title: String,
    /// URL snapshot.
    pub url: String,
    /// Creation time of the source entry, used for recency weighting.
    pub created_at: Option<DateTime<Utc>>,
    /// Tag snapshot.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EntryRef {
    /// Builds a snapshot of `entry` with the given match confidence.
    #[must_use]
    pub fn snapshot(entry: &Entry, confidence: u8) -> Self {
        Self {
            entry_id: entry.id.clone(),
            confidence: f64::from(confidence),
            title: entry.title.clone(),
            url: entry.url.clone(),
            created_at: Some(entry.created_at),
            tags: entry.tags.clone(),
        }
    }
}

/// A subtopic with mutable progress state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtopicState {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description from the catalog.
    pub description: Option<String>,
    /// Recency-weighted progress, `[0, 100]`.
    #[serde(default)]
    pub progress: u8,
    /// Progress status.
    #[serde(default)]
    pub status: TopicStatus,
    /// Attached entry snapshots; an entry id appears at most once.
    #[serde(default)]
    pub entries: Vec<EntryRef>,
}

/// A topic with mutable progress state and its subtopics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicState {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description from the catalog.
    pub description: Option<String>,
    /// Recency-weighted progress, `[0, 100]`.
    #[serde(default)]
    pub progress: u8,
    /// Progress status.
    #[serde(default)]
    pub status: TopicStatus,
    /// Attached entry snapshots; an entry id appears at most once.
    #[serde(default)]
    pub entries: Vec<EntryRef>,
    /// Subtopic states in catalog order.
    #[serde(default)]
    pub subtopics: Vec<SubtopicState>,
}

impl TopicState {
    fn contains(&self, entry_id: &EntryId) -> bool {
        self.entries.iter().any(|e| e.entry_id == *entry_id)
    }
}

/// Outcome of attaching an entry to the roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The entry reference was appended.
    Attached,
    /// The entry was already present in the target topic; nothing changed.
    AlreadyPresent,
}

/// A user's hierarchical curriculum with attached matched entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    /// Id of the catalog this roadmap was seeded from.
    pub catalog_id: String,
    /// Display name of the curriculum.
    pub name: String,
    /// Topic states in catalog order, plus the trailing catch-all topic.
    pub topics: Vec<TopicState>,
}

impl Roadmap {
    /// Seeds a fresh roadmap from a catalog.
    ///
    /// Every topic and subtopic starts at zero progress with no attached
    /// entries. A catch-all topic for unmatched content is appended after
    /// the catalog topics.
    #[must_use]
    pub fn seed(catalog: &Catalog) -> Self {
        let mut topics: Vec<TopicState> = catalog
            .topics()
            .iter()
            .map(|topic| TopicState {
                id: topic.id.clone(),
                name: topic.name.clone(),
                description: topic.description.clone(),
                progress: 0,
                status: TopicStatus::InProgress,
                entries: Vec::new(),
                subtopics: topic
                    .subtopics
                    .iter()
                    .map(|sub| SubtopicState {
                        id: sub.id.clone(),
                        name: sub.name.clone(),
                        description: sub.description.clone(),
                        progress: 0,
                        status: TopicStatus::InProgress,
                        entries: Vec::new(),
                    })
                    .collect(),
            })
            .collect();

        topics.push(TopicState {
            id: MISC_TOPIC_ID.to_string(),
            name: MISC_TOPIC_NAME.to_string(),
            description: Some("Entries that don't match any specific topic".to_string()),
            progress: 0,
            status: TopicStatus::InProgress,
            entries: Vec::new(),
            subtopics: Vec::new(),
        });

        Self {
            catalog_id: catalog.id.clone(),
            name: catalog.name.clone(),
            topics,
        }
    }

    /// Looks up a topic state by id.
    #[must_use]
    pub fn topic(&self, id: &str) -> Option<&TopicState> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Attaches an entry snapshot to the matched topic (and subtopic).
    ///
    /// The attach is idempotent: if the entry id is already present in the
    /// target topic's list, nothing changes and `AlreadyPresent` is
    /// returned. A subtopic id that does not exist under the matched topic
    /// is skipped silently. Progress of the touched topic and subtopic is
    /// recomputed as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the matched topic id is not in the
    /// roadmap.
    pub fn attach(
        &mut self,
        entry: &Entry,
        matched: &CrossReference,
        now: DateTime<Utc>,
    ) -> Result<AttachOutcome> {
        let topic = self
            .topics
            .iter_mut()
            .find(|t| t.id == matched.topic_id)
            .ok_or_else(|| Error::NotFound {
                kind: "topic".to_string(),
                id: matched.topic_id.clone(),
            })?;

        if topic.contains(&entry.id) {
            tracing::debug!(
                entry_id = %entry.id,
                topic_id = %topic.id,
                "Entry already attached to topic, skipping"
            );
            return Ok(AttachOutcome::AlreadyPresent);
        }

        topic
            .entries
            .push(EntryRef::snapshot(entry, matched.confidence));
        topic.progress = scoring::progress_at(now, &topic.entries);

        if let Some(subtopic_id) = &matched.subtopic_id {
            if let Some(subtopic) = topic.subtopics.iter_mut().find(|s| s.id == *subtopic_id) {
                if !subtopic.entries.iter().any(|e| e.entry_id == entry.id) {
                    subtopic
                        .entries
                        .push(EntryRef::snapshot(entry, matched.confidence));
                    subtopic.progress = scoring::progress_at(now, &subtopic.entries);
                }
            } else {
                tracing::debug!(
                    subtopic_id = %subtopic_id,
                    topic_id = %topic.id,
                    "Matched subtopic not present in roadmap, skipping"
                );
            }
        }

        tracing::info!(
            entry_id = %entry.id,
            topic_id = %topic.id,
            subtopic_id = matched.subtopic_id.as_deref().unwrap_or(""),
            confidence = matched.confidence,
            "Attached entry to roadmap"
        );

        Ok(AttachOutcome::Attached)
    }

    /// Recomputes progress for every topic and subtopic as of `now`.
    ///
    /// Progress decays with entry age, so displayed percentages drift even
    /// without new attachments.
    pub fn refresh_progress_at(&mut self, now: DateTime<Utc>) {
        for topic in &mut self.topics {
            topic.progress = scoring::progress_at(now, &topic.entries);
            for subtopic in &mut topic.subtopics {
                subtopic.progress = scoring::progress_at(now, &subtopic.entries);
            }
        }
    }

    /// Marks a topic as completed with full progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the topic id is not in the roadmap.
    pub fn complete_topic(&mut self, topic_id: &str) -> Result<()> {
        let topic = self
            .topics
            .iter_mut()
            .find(|t| t.id == topic_id)
            .ok_or_else(|| Error::NotFound {
                kind: "topic".to_string(),
                id: topic_id.to_string(),
            })?;

        topic.status = TopicStatus::Completed;
        topic.progress = 100;
        Ok(())
    }
}

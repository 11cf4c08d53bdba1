//! Roadmap matching (cross-referencing).
//!
//! Matches an approved entry against the catalog's topic/subtopic tree by
//! fuzzy string similarity over the entry's title and tags. Topic-level
//! and subtopic-level comparisons share one running maximum, so a
//! subtopic anywhere in the tree can displace a leading topic-level
//! candidate; unmatched content falls back to the catch-all topic at full
//! confidence.

use strsim::sorensen_dice;

use crate::catalog::{Catalog, MISC_TOPIC_ID, MISC_TOPIC_NAME};
use crate::models::Entry;

/// Similarity a candidate must clear to be considered a match.
const MATCH_THRESHOLD: f64 = 0.3;

/// Result of matching one entry against the catalog.
///
/// Ephemeral: only its effect (the roadmap attachment) is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Matched topic id.
    pub topic_id: String,
    /// Matched subtopic id, when a subtopic won.
    pub subtopic_id: Option<String>,
    /// Match confidence, `[0, 100]`.
    pub confidence: u8,
    /// The catalog name the search text matched against.
    pub matched_text: String,
    /// Matched topic name.
    pub topic_name: String,
    /// Matched subtopic name, when a subtopic won.
    pub subtopic_name: Option<String>,
}

/// Matches an entry against the catalog.
///
/// Comparisons run in catalog declaration order — each topic, then its
/// subtopics — against `lowercase(title + " " + tags)`. Strictly-greater
/// comparisons mean the first candidate at a given similarity wins. When
/// nothing clears the threshold the catch-all topic is returned with
/// confidence fixed at 100.
///
/// Returns `None` only when the winning candidate fails validation
/// (missing topic name, or a subtopic id without a name); such a
/// candidate is discarded rather than returned malformed.
#[must_use]
pub fn cross_reference(entry: &Entry, catalog: &Catalog) -> Option<CrossReference> {
    let search_text = format!("{} {}", entry.title, entry.tags.join(" ")).to_lowercase();

    let mut best: Option<CrossReference> = None;
    let mut best_score = 0.0_f64;

    for topic in catalog.topics() {
        let topic_score = sorensen_dice(&search_text, &topic.name.to_lowercase());
        if topic_score > best_score && topic_score > MATCH_THRESHOLD {
            best_score = topic_score;
            best = Some(CrossReference {
                topic_id: topic.id.clone(),
                subtopic_id: None,
                confidence: to_percent(topic_score),
                matched_text: topic.name.clone(),
                topic_name: topic.name.clone(),
                subtopic_name: None,
            });
        }

        for subtopic in &topic.subtopics {
            let subtopic_score = sorensen_dice(&search_text, &subtopic.name.to_lowercase());
            if subtopic_score > best_score && subtopic_score > MATCH_THRESHOLD {
                best_score = subtopic_score;
                best = Some(CrossReference {
                    topic_id: topic.id.clone(),
                    subtopic_id: Some(subtopic.id.clone()),
                    confidence: to_percent(subtopic_score),
                    matched_text: subtopic.name.clone(),
                    topic_name: topic.name.clone(),
                    subtopic_name: Some(subtopic.name.clone()),
                });
            }
        }
    }

    let candidate = match best {
        Some(candidate) => {
            metrics::counter!(
                "crossref_total",
                "outcome" => if candidate.subtopic_id.is_some() { "subtopic" } else { "topic" }
            )
            .increment(1);
            candidate
        },
        None => {
            tracing::debug!(
                entry_id = %entry.id,
                "No topic cleared the threshold, using catch-all"
            );
            metrics::counter!("crossref_total", "outcome" => "fallback").increment(1);
            CrossReference {
                topic_id: MISC_TOPIC_ID.to_string(),
                subtopic_id: None,
                confidence: 100,
                matched_text: MISC_TOPIC_NAME.to_string(),
                topic_name: MISC_TOPIC_NAME.to_string(),
                subtopic_name: None,
            }
        },
    };

    validate(candidate)
}

/// Rescales a raw similarity in `[0, 1]` to a clamped percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(score: f64) -> u8 {
    (score * 100.0).clamp(0.0, 100.0) as u8
}

/// Discards malformed candidates instead of returning partial objects.
fn validate(candidate: CrossReference) -> Option<CrossReference> {
    if candidate.topic_id.is_empty() || candidate.topic_name.is_empty() {
        tracing::warn!(?candidate, "Invalid match: missing topic id or name");
        return None;
    }
    if candidate.subtopic_id.is_some()
        && candidate
            .subtopic_name
            .as_deref()
            .is_none_or(str::is_empty)
    {
        tracing::warn!(?candidate, "Invalid match: missing subtopic name");
        return None;
    }
    Some(candidate)
}

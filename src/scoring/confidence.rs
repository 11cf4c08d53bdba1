//! Additive confidence heuristic.

use crate::models::{Entry, EntryStatus};

/// Base score every entry starts from.
const BASE: i64 = 50;

/// Maximum bonus for tag count.
const TAG_BONUS_CAP: i64 = 20;

/// Tags that indicate deliberate learning.
const LEARNING_TAGS: &[&str] = &["tutorial", "course", "learn"];

/// Computes the confidence score for an entry.
///
/// Purely additive heuristic over the entry's attributes; identical
/// inputs always yield identical output. Used both at ingestion time
/// (status pending) and at approval time, where the approved status alone
/// is worth +20 over the pending-time score of the same entry.
///
/// The video-completion bonus is not clamped on its own (a watched length
/// beyond the video length can push it past 25); only the final result is
/// clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn confidence(entry: &Entry) -> u8 {
    let mut score = BASE;

    if !entry.title.is_empty() {
        score += 10;
    }

    if !entry.tags.is_empty() {
        score += (entry.tags.len() as i64 * 5).min(TAG_BONUS_CAP);
    }

    if !entry.primary_topic.is_empty() {
        score += 10;
    }

    if entry.summary.as_deref().is_some_and(|s| !s.is_empty()) {
        score += 10;
    }

    if entry.is_video && entry.video_seconds > 0 && entry.watched_seconds > 0 {
        let completion =
            f64::from(entry.watched_seconds) / f64::from(entry.video_seconds);
        score += (completion * 25.0).round() as i64;
    }

    let lower_title = entry.title.to_lowercase();
    if lower_title.contains("completed") {
        score += 20;
    } else if lower_title.contains("revising") {
        score += 15;
    }

    if entry
        .tags
        .iter()
        .any(|tag| LEARNING_TAGS.contains(&tag.to_lowercase().as_str()))
    {
        score += 25;
    }

    if entry.status == EntryStatus::Approved {
        score += 20;
    }

    score.clamp(0, 100) as u8
}

//! Recency-weighted progress aggregation.

use chrono::{DateTime, Utc};

use crate::models::EntryRef;

/// Days over which an entry's weight decays linearly to zero.
const RECENCY_WINDOW_DAYS: f64 = 30.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Computes topic progress from attached entry snapshots as of `now`.
///
/// Weighted average of entry confidences where weight falls linearly from
/// 1 (just created) to 0 (30 days old); entries without a creation time
/// weight 1. Snapshots whose confidence is not a finite number in
/// `[0, 100]` are ignored. Returns 0 when nothing remains or every
/// remaining entry has fully decayed.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_at(now: DateTime<Utc>, entries: &[EntryRef]) -> u8 {
    let valid: Vec<&EntryRef> = entries
        .iter()
        .filter(|e| e.confidence.is_finite() && (0.0..=100.0).contains(&e.confidence))
        .collect();

    if valid.is_empty() {
        return 0;
    }

    let weight = |entry: &EntryRef| -> f64 {
        let created = entry.created_at.unwrap_or(now);
        let days_old = (now - created).num_seconds() as f64 / SECONDS_PER_DAY;
        (1.0 - days_old / RECENCY_WINDOW_DAYS).max(0.0)
    };

    let total_weight: f64 = valid.iter().map(|e| weight(e)).sum();
    if total_weight == 0.0 {
        return 0;
    }

    let weighted_sum: f64 = valid.iter().map(|e| e.confidence * weight(e)).sum();

    (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Computes topic progress as of the current time.
#[must_use]
pub fn progress(entries: &[EntryRef]) -> u8 {
    progress_at(Utc::now(), entries)
}

//! Property-based tests for the scoring and classification core.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Confidence scores are always within [0, 100]
//! - Progress aggregation is bounded and filters invalid snapshots
//! - Classification is deterministic and produces deduplicated output
//! - Cross-referencing always lands on a valid catalog topic or the
//!   catch-all

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{Duration, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

use skillpath::models::{Entry, EntryId, EntryRef, EntrySource, EntryStatus};
use skillpath::{Catalog, MISC_TOPIC_ID, classify, confidence, cross_reference, progress_at};

fn arb_status() -> impl Strategy<Value = EntryStatus> {
    prop::sample::select(vec![
        EntryStatus::Pending,
        EntryStatus::Approved,
        EntryStatus::Rejected,
    ])
}

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        "[a-zA-Z0-9 ]{0,60}",
        prop::collection::vec("[a-z]{1,12}", 0..8),
        "[a-zA-Z]{0,20}",
        any::<bool>(),
        0u32..20_000,
        0u32..20_000,
        arb_status(),
        prop::option::of("[a-zA-Z ]{1,40}"),
    )
        .prop_map(
            |(title, tags, topic, is_video, video_seconds, watched_seconds, status, summary)| {
                let now = Utc::now();
                Entry {
                    id: EntryId::generate(),
                    url: "https://example.org/page".to_string(),
                    title,
                    visited_at: now,
                    visit_seconds: 0,
                    tags,
                    keywords: Vec::new(),
                    primary_topic: topic,
                    confidence: 0,
                    is_video,
                    video_seconds,
                    watched_seconds,
                    status,
                    source: EntrySource::Extension,
                    summary,
                    notes: None,
                    created_at: now,
                    updated_at: now,
                    approved_at: None,
                    cross_referenced_at: None,
                }
            },
        )
}

proptest! {
    /// Property: confidence is always within [0, 100].
    #[test]
    fn prop_confidence_bounded(entry in arb_entry()) {
        let score = confidence(&entry);
        prop_assert!(score <= 100);
    }

    /// Property: confidence is deterministic.
    #[test]
    fn prop_confidence_deterministic(entry in arb_entry()) {
        prop_assert_eq!(confidence(&entry), confidence(&entry));
    }

    /// Property: approval never lowers the score of the same entry.
    #[test]
    fn prop_approval_never_lowers_score(entry in arb_entry()) {
        let mut pending = entry;
        pending.status = EntryStatus::Pending;
        let mut approved = pending.clone();
        approved.status = EntryStatus::Approved;
        prop_assert!(confidence(&approved) >= confidence(&pending));
    }

    /// Property: progress is bounded for arbitrary snapshots.
    #[test]
    fn prop_progress_bounded(
        confidences in prop::collection::vec(-50.0f64..200.0, 0..20),
        ages in prop::collection::vec(0i64..90, 20),
    ) {
        let now = Utc::now();
        let entries: Vec<EntryRef> = confidences
            .iter()
            .zip(ages.iter())
            .map(|(&confidence, &age)| EntryRef {
                entry_id: EntryId::generate(),
                confidence,
                title: "t".to_string(),
                url: "https://example.org".to_string(),
                created_at: Some(now - Duration::days(age)),
                tags: Vec::new(),
            })
            .collect();
        let result = progress_at(now, &entries);
        prop_assert!(result <= 100);
    }

    /// Property: snapshots out of range never influence the result.
    #[test]
    fn prop_progress_ignores_invalid(valid in 0.0f64..=100.0) {
        let now = Utc::now();
        let make = |confidence: f64| EntryRef {
            entry_id: EntryId::generate(),
            confidence,
            title: "t".to_string(),
            url: "https://example.org".to_string(),
            created_at: Some(now),
            tags: Vec::new(),
        };

        let with_invalid = vec![make(valid), make(f64::NAN), make(-1.0), make(1000.0)];
        let without = vec![make(valid)];
        prop_assert_eq!(progress_at(now, &with_invalid), progress_at(now, &without));
    }

    /// Property: classification is deterministic and deduplicated.
    #[test]
    fn prop_classify_deterministic_and_deduped(
        title in "[a-zA-Z0-9 ]{0,60}",
        path in "[a-z0-9/-]{0,30}",
    ) {
        let url = format!("https://example.org/{path}");
        let first = classify(&title, &url);
        let second = classify(&title, &url);
        prop_assert_eq!(&first, &second);

        let unique: HashSet<&String> = first.tags.iter().collect();
        prop_assert_eq!(unique.len(), first.tags.len());
        let unique_keywords: HashSet<&String> = first.keywords.iter().collect();
        prop_assert_eq!(unique_keywords.len(), first.keywords.len());
    }

    /// Property: excluded output is always the terminal shape.
    #[test]
    fn prop_excluded_shape(title in "[a-zA-Z ]{0,40}") {
        let result = classify(&title, "https://netflix.com/browse");
        prop_assert!(!result.is_learning_content);
        prop_assert!(!result.is_video);
        prop_assert_eq!(result.primary_topic.as_str(), "Excluded");
        prop_assert!(result.tags.is_empty());
        prop_assert!(result.keywords.is_empty());
    }

    /// Property: the matcher always resolves to a catalog topic or the
    /// catch-all, never to an unknown id.
    #[test]
    fn prop_crossref_lands_on_known_topic(
        title in "[a-zA-Z ]{1,40}",
        tags in prop::collection::vec("[a-z]{1,10}", 0..5),
    ) {
        let catalog = Catalog::builtin().unwrap();
        let now = Utc::now();
        let entry = Entry {
            id: EntryId::generate(),
            url: "https://example.org".to_string(),
            title,
            visited_at: now,
            visit_seconds: 0,
            tags,
            keywords: Vec::new(),
            primary_topic: "General".to_string(),
            confidence: 50,
            is_video: false,
            video_seconds: 0,
            watched_seconds: 0,
            status: EntryStatus::Approved,
            source: EntrySource::Extension,
            summary: None,
            notes: None,
            created_at: now,
            updated_at: now,
            approved_at: Some(now),
            cross_referenced_at: None,
        };

        let matched = cross_reference(&entry, &catalog).unwrap();
        prop_assert!(matched.confidence <= 100);
        prop_assert!(
            matched.topic_id == MISC_TOPIC_ID || catalog.topic(&matched.topic_id).is_some()
        );
    }
}

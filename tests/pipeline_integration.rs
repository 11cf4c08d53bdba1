//! End-to-end pipeline tests: submit → approve → roadmap progress.

// Integration tests use unwrap/expect for brevity - panics are acceptable in tests
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use skillpath::storage::SqliteStore;
use skillpath::{
    Catalog, EntryId, EntryStatus, IngestService, MISC_TOPIC_ID, ReviewService, SubmitOutcome,
    SubmitRequest,
};

fn pipeline() -> (
    IngestService<Arc<SqliteStore>>,
    ReviewService<Arc<SqliteStore>, Arc<SqliteStore>>,
) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let ingest = IngestService::new(Arc::clone(&store), 64);
    let review = ReviewService::new(Arc::clone(&store), store, catalog, "default");
    (ingest, review)
}

fn submit(ingest: &IngestService<Arc<SqliteStore>>, title: &str, url: &str) -> EntryId {
    match ingest
        .submit(SubmitRequest {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        })
        .unwrap()
    {
        SubmitOutcome::Created(entry) => entry.id.clone(),
        SubmitOutcome::Discarded { reason } => panic!("unexpected discard: {reason}"),
    }
}

#[test]
fn react_hooks_page_flows_into_react_topic() {
    let (ingest, review) = pipeline();

    // A short title keeps the search text close to the subtopic name;
    // the learning domain alone qualifies it as learning content.
    let id = submit(
        &ingest,
        "React Hooks",
        "https://reactjs.org/docs/hooks-intro.html",
    );

    // Pending entry with classifier outputs and ingestion-time score
    let pending = review.list(Some(EntryStatus::Pending), 10).unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].tags.contains(&"code".to_string()));
    assert_eq!(pending[0].primary_topic, "Programming");
    assert!(pending[0].confidence >= 75);

    // Approval re-scores, matches, and attaches
    let report = review.approve(&[id.clone()]).unwrap();
    assert_eq!(report.processed.len(), 1);
    assert!(report.errors.is_empty());

    let roadmap = review.roadmap_view().unwrap();
    let react = roadmap.topic("react").unwrap();
    assert_eq!(react.entries.len(), 1);
    assert_eq!(react.entries[0].entry_id, id);
    assert!(react.progress > 0);

    // The subtopic name "React Hooks" is the closest match
    let hooks = react
        .subtopics
        .iter()
        .find(|s| s.id == "react-hooks")
        .unwrap();
    assert_eq!(hooks.entries.len(), 1);
}

#[test]
fn rich_tag_sets_dilute_matches_into_miscellaneous() {
    // The matcher compares the whole title-plus-tags text against short
    // topic names; a heavily tagged entry rarely clears the threshold and
    // lands in the catch-all bucket at full confidence.
    let (ingest, review) = pipeline();

    let id = submit(
        &ingest,
        "React Hooks Tutorial - Complete Guide",
        "https://reactjs.org/tutorial",
    );
    review.approve(&[id]).unwrap();

    let roadmap = review.roadmap_view().unwrap();
    let misc = roadmap.topic(MISC_TOPIC_ID).unwrap();
    assert_eq!(misc.entries.len(), 1);
}

#[test]
fn checkout_page_is_never_persisted() {
    let (ingest, review) = pipeline();

    let outcome = ingest
        .submit(SubmitRequest {
            title: "Checkout - Amazon.com".to_string(),
            url: "https://amazon.com/checkout".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Discarded { .. }));
    assert!(review.list(None, 10).unwrap().is_empty());
}

#[test]
fn double_approval_keeps_one_roadmap_reference() {
    let (ingest, review) = pipeline();

    let id = submit(
        &ingest,
        "Docker Tutorial for Beginners",
        "https://docker.com/docs/get-started",
    );

    let first = review.approve(&[id.clone()]).unwrap();
    assert_eq!(first.processed.len(), 1);

    let second = review.approve(&[id.clone()]).unwrap();
    assert_eq!(second.errors.len(), 1);

    // Re-running the matcher directly is also idempotent
    review.cross_reference_entry(&id).unwrap();

    let roadmap = review.roadmap_view().unwrap();
    let total: usize = roadmap.topics.iter().map(|t| t.entries.len()).sum();
    assert_eq!(total, 1, "entry must appear exactly once across topics");
}

#[test]
fn unmatched_learning_content_falls_back_to_miscellaneous() {
    let (ingest, review) = pipeline();

    let id = submit(
        &ingest,
        "Watercolor blending techniques explained",
        "https://medium.com/@artist/watercolor-blending",
    );

    review.approve(&[id]).unwrap();

    let roadmap = review.roadmap_view().unwrap();
    let misc = roadmap.topic(MISC_TOPIC_ID).unwrap();
    assert_eq!(misc.entries.len(), 1);
    assert!((misc.entries[0].confidence - 100.0).abs() < f64::EPSILON);
}

#[test]
fn stats_reflect_lifecycle() {
    let (ingest, review) = pipeline();

    let keep = submit(
        &ingest,
        "SQL Tutorial - W3Schools",
        "https://w3schools.com/sql/",
    );
    let drop = submit(
        &ingest,
        "TypeScript Handbook",
        "https://typescriptlang.org/docs/handbook/",
    );

    review.approve(&[keep]).unwrap();
    review.reject(&[drop]).unwrap();

    let stats = review.stats().unwrap();
    assert_eq!(stats.counts.pending, 0);
    assert_eq!(stats.counts.approved, 1);
    assert_eq!(stats.counts.rejected, 1);
    assert!(stats.topics.iter().any(|t| t.entries > 0));
}

#[test]
fn pipeline_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skillpath.db");
    let catalog = Arc::new(Catalog::builtin().unwrap());

    let id = {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let ingest = IngestService::new(Arc::clone(&store), 64);
        let review = ReviewService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&catalog),
            "default",
        );
        let id = submit(
            &ingest,
            "CSS Grid Layout Guide",
            "https://css-tricks.com/snippets/css/complete-guide-grid/",
        );
        review.approve(&[id.clone()]).unwrap();
        id
    };

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let review = ReviewService::new(Arc::clone(&store), store, catalog, "default");

    let entry = review.list(Some(EntryStatus::Approved), 10).unwrap();
    assert_eq!(entry.len(), 1);
    assert_eq!(entry[0].id, id);

    let roadmap = review.roadmap_view().unwrap();
    let attached: usize = roadmap.topics.iter().map(|t| t.entries.len()).sum();
    assert_eq!(attached, 1);
}

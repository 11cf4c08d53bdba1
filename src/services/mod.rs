//! Business logic services.
//!
//! Services orchestrate the classifier, scorer, matcher, and stores to
//! provide the high-level ingest and review operations.

mod ingest;
mod review;

pub use ingest::{IngestService, SubmitOutcome, SubmitRequest};
pub use review::{ApproveReport, EntryError, ReviewService, Stats, TopicSummary};

//! # Skillpath
//!
//! Learning-progress engine that classifies browsing history against a
//! skill roadmap.
//!
//! Skillpath ingests visited pages, decides whether each one is learning
//! content, scores how confidently it was understood, and matches approved
//! entries against a predefined curriculum to track topic progress.
//!
//! ## Pipeline
//!
//! 1. **Classify** — rule-based tagging and learning-content detection
//!    over `(title, url)` pairs, memoized in a bounded LRU cache
//! 2. **Score** — additive 0–100 confidence heuristic per entry
//! 3. **Cross-reference** — fuzzy similarity match of approved entries
//!    into the catalog's topic/subtopic tree
//! 4. **Aggregate** — recency-weighted progress per topic and subtopic
//!
//! ## Example
//!
//! ```rust,ignore
//! use skillpath::{IngestService, SubmitRequest};
//!
//! let service = IngestService::new(store, 1024);
//! let outcome = service.submit(SubmitRequest {
//!     title: "React Hooks Tutorial - Complete Guide".to_string(),
//!     url: "https://reactjs.org/tutorial".to_string(),
//!     ..Default::default()
//! })?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod catalog;
pub mod classify;
pub mod config;
pub mod crossref;
pub mod models;
pub mod observability;
pub mod scoring;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogSubtopic, CatalogTopic, MISC_TOPIC_ID, MISC_TOPIC_NAME};
pub use classify::{Classification, Classifier, classify};
pub use config::Config;
pub use crossref::{CrossReference, cross_reference};
pub use models::{
    AttachOutcome, Entry, EntryId, EntryRef, EntrySource, EntryStatus, Roadmap, StatusCounts,
    SubtopicState, TopicState, TopicStatus,
};
pub use scoring::{confidence, progress, progress_at};
pub use services::{ApproveReport, IngestService, ReviewService, SubmitOutcome, SubmitRequest};
pub use storage::{EntryStore, RoadmapStore};

/// Error type for skillpath operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait
/// implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing required parameters, empty titles/URLs, duplicate visits |
/// | `InvalidCatalog` | Catalog JSON fails shape validation at load time |
/// | `NotFound` | Entry or roadmap topic looked up by an unknown id |
/// | `OperationFailed` | I/O errors, database queries fail, lock poisoning |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Required parameters are missing (e.g., empty title in submit)
    /// - A visit with the same `(url, visited_at)` already exists
    /// - A status string cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The static catalog failed validation.
    ///
    /// Raised at load time, never per request: duplicate ids anywhere in
    /// the tree, empty ids or names, or a catalog with no topics.
    #[error("invalid catalog: {reason}")]
    InvalidCatalog {
        /// Why the catalog was rejected.
        reason: String,
    },

    /// A record was looked up by an id that does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// The kind of record ("entry", "topic").
        kind: String,
        /// The id that was looked up.
        id: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - Filesystem I/O errors occur
    /// - A lock is poisoned
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for skillpath operations.
pub type Result<T> = std::result::Result<T, Error>;

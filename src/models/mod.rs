//! Data models for skillpath.
//!
//! This module contains all the core data structures used throughout the
//! system.

mod entry;
mod roadmap;

pub use entry::{Entry, EntryId, EntrySource, EntryStatus, StatusCounts};
pub use roadmap::{AttachOutcome, EntryRef, Roadmap, SubtopicState, TopicState, TopicStatus};

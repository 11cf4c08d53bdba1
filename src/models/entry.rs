//! Entry types and identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new entry ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random entry ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Review status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting user review.
    #[default]
    Pending,
    /// Accepted into the roadmap.
    Approved,
    /// Rejected by the user.
    Rejected,
}

impl EntryStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Harvested by the browser extension.
    #[default]
    Extension,
    /// Entered by hand.
    Manual,
    /// Bulk import.
    Import,
}

impl EntrySource {
    /// Returns the source as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Manual => "manual",
            Self::Import => "import",
        }
    }

    /// Parses a source from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "extension" => Some(Self::Extension),
            "manual" => Some(Self::Manual),
            "import" => Some(Self::Import),
            _ => None,
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified record of a single browsing-history visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub id: EntryId,
    /// The visited URL.
    pub url: String,
    /// The page title at visit time.
    pub title: String,
    /// When the page was visited.
    pub visited_at: DateTime<Utc>,
    /// Seconds spent on the page.
    #[serde(default)]
    pub visit_seconds: u32,
    /// Lowercase tags extracted by the classifier.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Keywords extracted by the classifier.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Best-guess category label, `"General"` when nothing matched.
    pub primary_topic: String,
    /// Confidence score, always within `[0, 100]`.
    pub confidence: u8,
    /// Whether the URL is on a known video platform.
    #[serde(default)]
    pub is_video: bool,
    /// Total video length in seconds.
    #[serde(default)]
    pub video_seconds: u32,
    /// Watched length in seconds.
    #[serde(default)]
    pub watched_seconds: u32,
    /// Current review status.
    #[serde(default)]
    pub status: EntryStatus,
    /// Where the entry came from.
    #[serde(default)]
    pub source: EntrySource,
    /// Derived human-readable description.
    pub summary: Option<String>,
    /// Free-form user notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the entry was approved, if it has been.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the entry was last cross-referenced into the roadmap.
    pub cross_referenced_at: Option<DateTime<Utc>>,
}

/// Entry counts grouped by review status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Entries awaiting review.
    pub pending: u64,
    /// Approved entries.
    pub approved: u64,
    /// Rejected entries.
    pub rejected: u64,
}

impl StatusCounts {
    /// Total number of entries across all statuses.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected
    }
}

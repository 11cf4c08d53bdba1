//! Static curriculum catalog.
//!
//! The catalog is the read-only topic/subtopic tree that approved entries
//! are matched against. It is loaded once at startup, validated eagerly
//! (malformed configuration fails fast, never per request), and indexed
//! by id for lookup.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{Error, Result};

/// Id of the catch-all topic appended to every seeded roadmap.
pub const MISC_TOPIC_ID: &str = "miscellaneous";

/// Display name of the catch-all topic.
pub const MISC_TOPIC_NAME: &str = "Miscellaneous";

/// Default curriculum shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// A leaf of the curriculum tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSubtopic {
    /// Unique id within the whole tree.
    pub id: String,
    /// Display name; the matcher compares against this.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A top-level topic with its subtopics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTopic {
    /// Unique id within the whole tree.
    pub id: String,
    /// Display name; the matcher compares against this.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Subtopics in declaration order.
    #[serde(default)]
    pub subtopics: Vec<CatalogSubtopic>,
}

/// The static, predefined topic tree used as the matching target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog id.
    pub id: String,
    /// Curriculum display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Topics in declaration order.
    topics: Vec<CatalogTopic>,
    /// Topic id → position, built at load time.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Parses and validates a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] if the JSON does not parse, the
    /// catalog has no topics, any id or name is empty, or an id repeats
    /// anywhere in the tree.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidCatalog {
                reason: format!("malformed JSON: {e}"),
            })?;
        catalog.validate()?;
        catalog.build_index();
        Ok(catalog)
    }

    /// Loads and validates a catalog from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be read, or
    /// [`Error::InvalidCatalog`] if validation fails.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_catalog".to_string(),
            cause: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Returns the curriculum shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] if the embedded asset is
    /// malformed; this indicates a packaging defect.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Topics in declaration order.
    #[must_use]
    pub fn topics(&self) -> &[CatalogTopic] {
        &self.topics
    }

    /// Looks up a topic by id.
    #[must_use]
    pub fn topic(&self, id: &str) -> Option<&CatalogTopic> {
        self.index.get(id).and_then(|&i| self.topics.get(i))
    }

    /// Total number of topics.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(Error::InvalidCatalog {
                reason: "catalog has no topics".to_string(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for topic in &self.topics {
            if topic.id.trim().is_empty() || topic.name.trim().is_empty() {
                return Err(Error::InvalidCatalog {
                    reason: format!("topic with empty id or name (id: '{}')", topic.id),
                });
            }
            if !seen.insert(topic.id.as_str()) {
                return Err(Error::InvalidCatalog {
                    reason: format!("duplicate id '{}'", topic.id),
                });
            }
            for subtopic in &topic.subtopics {
                if subtopic.id.trim().is_empty() || subtopic.name.trim().is_empty() {
                    return Err(Error::InvalidCatalog {
                        reason: format!(
                            "subtopic with empty id or name under topic '{}'",
                            topic.id
                        ),
                    });
                }
                if !seen.insert(subtopic.id.as_str()) {
                    return Err(Error::InvalidCatalog {
                        reason: format!("duplicate id '{}'", subtopic.id),
                    });
                }
            }
        }
        Ok(())
    }

    fn build_index(&mut self) {
        self.index = self
            .topics
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
    }
}

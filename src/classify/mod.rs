//! Rule-based content classification.
//!
//! Decides whether a visited page is learning content, extracts tags and
//! keywords, and guesses a primary topic. Detection is pure keyword,
//! domain, and regex matching over the `(title, url)` pair; no network
//! calls and no model inference.
//!
//! Exclusion has the highest priority: a URL on a known non-learning
//! domain or path is terminal, even when it also looks like a video
//! platform.

mod vocab;

pub use vocab::{CATEGORIES, Category, EXCLUDED_TERMS, LEARNING_TYPES, VIDEO_PLATFORMS};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::RwLock;
use strsim::sorensen_dice;

use vocab::{
    LEARNING_DOMAINS, LEARNING_PATTERNS, NON_LEARNING_DOMAINS, NON_LEARNING_PATTERNS,
};

/// Primary topic assigned when no category matches.
pub const GENERAL_TOPIC: &str = "General";

/// Primary topic assigned to excluded content.
pub const EXCLUDED_TOPIC: &str = "Excluded";

/// Similarity a category must clear to override the provisional topic.
const TOPIC_REFINEMENT_THRESHOLD: f64 = 0.3;

/// Default capacity of the memoization cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Result of classifying a `(title, url)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Deduplicated lowercase tags.
    pub tags: Vec<String>,
    /// Deduplicated matched keywords.
    pub keywords: Vec<String>,
    /// Best-guess category label.
    pub primary_topic: String,
    /// Templated one-sentence description.
    pub summary: String,
    /// Whether the page looks like learning content.
    pub is_learning_content: bool,
    /// Whether the URL is on a known video platform.
    pub is_video: bool,
}

impl Classification {
    /// Terminal result for excluded (non-learning) content.
    ///
    /// The video flag is reset even when the domain matched a video
    /// platform: exclusion takes precedence.
    #[must_use]
    fn excluded() -> Self {
        Self {
            tags: Vec::new(),
            keywords: Vec::new(),
            primary_topic: EXCLUDED_TOPIC.to_string(),
            summary: "Non-learning content".to_string(),
            is_learning_content: false,
            is_video: false,
        }
    }
}

/// Classifies a page title and URL.
///
/// Pure function: identical inputs always yield identical output. Use
/// [`Classifier`] for the memoized variant.
#[must_use]
pub fn classify(title: &str, url: &str) -> Classification {
    let lower_title = title.to_lowercase();
    let lower_url = url.to_lowercase();

    let is_video = VIDEO_PLATFORMS
        .iter()
        .any(|platform| lower_url.contains(platform));

    // Exclusion check runs first and is terminal.
    if NON_LEARNING_DOMAINS.iter().any(|d| lower_url.contains(d))
        || NON_LEARNING_PATTERNS.iter().any(|p| p.is_match(url))
    {
        tracing::debug!(url = %url, "Excluded non-learning content");
        metrics::counter!("classify_total", "outcome" => "excluded").increment(1);
        return Classification::excluded();
    }

    let has_learning_domain = LEARNING_DOMAINS.iter().any(|d| lower_url.contains(d));
    let has_learning_pattern = LEARNING_PATTERNS
        .iter()
        .any(|p| p.is_match(title) || p.is_match(url));
    let has_learning_keyword = LEARNING_TYPES
        .iter()
        .any(|(_, keywords)| keywords.iter().any(|k| lower_title.contains(k)));

    let is_learning_content = has_learning_domain || has_learning_pattern || has_learning_keyword;

    let mut tags: Vec<String> = Vec::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut primary_topic = GENERAL_TOPIC.to_string();

    // Category keyword extraction; first matching category sets the
    // provisional primary topic.
    for category in CATEGORIES {
        let matching: Vec<&str> = category
            .keywords
            .iter()
            .filter(|k| lower_title.contains(*k))
            .copied()
            .collect();
        if !matching.is_empty() {
            tags.extend(category.tags.iter().map(ToString::to_string));
            keywords.extend(matching.iter().map(ToString::to_string));
            if primary_topic == GENERAL_TOPIC {
                primary_topic = category.label.to_string();
            }
        }
    }

    // Learning-type tags (tutorial/course/documentation/practice).
    for (learning_type, type_keywords) in LEARNING_TYPES {
        if type_keywords.iter().any(|k| lower_title.contains(k)) {
            tags.push((*learning_type).to_string());
        }
    }

    // Domain-specific tags by URL substring.
    if lower_url.contains("github.com") {
        tags.push("code".to_string());
        tags.push("repository".to_string());
    } else if lower_url.contains("stackoverflow.com") {
        tags.push("qa".to_string());
        tags.push("solution".to_string());
    } else if lower_url.contains("youtube.com") || lower_url.contains("youtu.be") {
        tags.push("video".to_string());
        if lower_title.contains("tutorial") {
            tags.push("tutorial".to_string());
        }
    } else if lower_url.contains("udemy.com") || lower_url.contains("coursera.org") {
        tags.push("course".to_string());
    }

    // Fuzzy refinement: the best-scoring category overrides the
    // provisional topic when it clears the threshold.
    if let Some(label) = best_category(&lower_title) {
        primary_topic = label.to_string();
    }

    let tags = dedup(filter_excluded(tags));
    let keywords = dedup(filter_excluded(keywords));
    let summary = build_summary(&primary_topic, &tags);

    metrics::counter!(
        "classify_total",
        "outcome" => if is_learning_content { "learning" } else { "other" }
    )
    .increment(1);

    Classification {
        tags,
        keywords,
        primary_topic,
        summary,
        is_learning_content,
        is_video,
    }
}

/// Finds the category whose keywords are most similar to the title.
///
/// Returns the label only when the best bigram similarity strictly
/// exceeds the refinement threshold; ties keep the earlier category.
fn best_category(lower_title: &str) -> Option<&'static str> {
    let mut best: Option<&'static str> = None;
    let mut best_score = 0.0_f64;

    for category in CATEGORIES {
        let score = category
            .keywords
            .iter()
            .map(|k| sorensen_dice(lower_title, k))
            .fold(0.0_f64, f64::max);
        if score > best_score {
            best_score = score;
            best = Some(category.label);
        }
    }

    (best_score > TOPIC_REFINEMENT_THRESHOLD)
        .then_some(best)
        .flatten()
}

/// Drops values present in the exclusion vocabulary.
fn filter_excluded(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !EXCLUDED_TERMS.contains(&v.as_str()))
        .collect()
}

/// Deduplicates preserving first-occurrence order.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

/// Builds the templated summary sentence.
fn build_summary(primary_topic: &str, tags: &[String]) -> String {
    let covered = tags
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let resource_type = tags
        .iter()
        .find(|t| matches!(t.as_str(), "tutorial" | "course" | "documentation"))
        .map_or("learning resource", String::as_str);

    format!(
        "Learning content about {}. Covers topics like {}. This appears to be a {}.",
        primary_topic.to_lowercase(),
        covered,
        resource_type
    )
}

/// Memoizing classifier.
///
/// Wraps [`classify`] with a bounded LRU cache keyed by the exact
/// `(title, url)` pair. Correctness does not depend on the cache, only
/// on cache correctness when hit, so eviction is safe at any capacity.
///
/// # Thread Safety
///
/// Uses `RwLock` for interior mutability. Lock poisoning is handled with
/// fail-open semantics: a poisoned lock means the result is recomputed
/// instead of served from cache.
pub struct Classifier {
    /// LRU cache mapping `(title, url)` to classification results.
    cache: RwLock<LruCache<(String, String), Classification>>,
}

impl Classifier {
    /// Creates a classifier with the given cache capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    #[must_use]
    #[allow(clippy::expect_used)] // Documented panic for invalid input
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("capacity must be > 0");
        Self {
            cache: RwLock::new(LruCache::new(cap)),
        }
    }

    /// Classifies a `(title, url)` pair, serving repeats from cache.
    #[must_use]
    pub fn classify(&self, title: &str, url: &str) -> Classification {
        let key = (title.to_string(), url.to_string());

        let cached = {
            let cache = self.cache.read().ok();
            cache.and_then(|c| c.peek(&key).cloned())
        };

        if let Some(result) = cached {
            tracing::debug!(title = %title, "Using cached classification");
            metrics::counter!("classify_cache_total", "result" => "hit").increment(1);
            return result;
        }

        metrics::counter!("classify_cache_total", "result" => "miss").increment(1);
        let result = classify(title, url);

        if let Ok(mut cache) = self.cache.write() {
            cache.put(key, result.clone());
            metrics::gauge!("classify_cache_size").set(cache.len() as f64);
        }

        result
    }

    /// Returns the current number of cached results.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

//! Classification vocabularies.
//!
//! Static pattern data for rule-based learning-content detection.
//! Extracted from `classify/mod.rs` to reduce file size.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

/// A content category with its detection keywords and output tags.
#[derive(Debug)]
pub struct Category {
    /// Lowercase category key.
    pub key: &'static str,
    /// Capitalized label used as the primary topic.
    pub label: &'static str,
    /// Keywords that indicate this category in a title.
    pub keywords: &'static [&'static str],
    /// Tags appended when the category matches.
    pub tags: &'static [&'static str],
}

/// Predefined categories in fixed iteration order.
///
/// Order matters: the first category whose keywords match the title sets
/// the provisional primary topic.
pub static CATEGORIES: &[Category] = &[
    Category {
        key: "programming",
        label: "Programming",
        keywords: &[
            "javascript",
            "python",
            "java",
            "c++",
            "typescript",
            "react",
            "node",
            "express",
            "django",
            "flask",
        ],
        tags: &["code", "programming", "development", "software"],
    },
    Category {
        key: "web",
        label: "Web",
        keywords: &[
            "html", "css", "frontend", "backend", "fullstack", "web", "browser", "dom", "api",
            "rest",
        ],
        tags: &["web", "frontend", "backend", "fullstack"],
    },
    Category {
        key: "data",
        label: "Data",
        keywords: &[
            "data",
            "database",
            "sql",
            "nosql",
            "mongodb",
            "postgres",
            "mysql",
            "redis",
            "analytics",
        ],
        tags: &["data", "database", "analytics"],
    },
    Category {
        key: "devops",
        label: "Devops",
        keywords: &[
            "docker",
            "kubernetes",
            "aws",
            "azure",
            "cloud",
            "ci",
            "cd",
            "deployment",
            "infrastructure",
        ],
        tags: &["devops", "cloud", "infrastructure"],
    },
    Category {
        key: "ai",
        label: "Ai",
        keywords: &[
            "ai",
            "ml",
            "machine learning",
            "neural",
            "tensorflow",
            "pytorch",
            "deep learning",
            "artificial intelligence",
            "neural networks",
            "nlp",
            "natural language processing",
            "computer vision",
            "cv",
            "reinforcement learning",
            "rl",
            "gpt",
            "llm",
            "large language model",
        ],
        tags: &[
            "ai",
            "ml",
            "deep learning",
            "artificial intelligence",
            "machine learning",
        ],
    },
];

/// Learning resource types and the title keywords that indicate them.
///
/// The type name doubles as a tag when any of its keywords appear.
pub static LEARNING_TYPES: &[(&str, &[&str])] = &[
    (
        "tutorial",
        &["tutorial", "guide", "how to", "learn", "basics", "advanced"],
    ),
    (
        "course",
        &["course", "class", "lecture", "lesson", "module", "section"],
    ),
    (
        "documentation",
        &["docs", "documentation", "reference", "api", "manual"],
    ),
    (
        "practice",
        &["exercise", "practice", "challenge", "project", "assignment"],
    ),
];

/// Terms that indicate non-learning content; dropped from tags and
/// keywords before output.
pub static EXCLUDED_TERMS: &[&str] = &[
    "fun",
    "game",
    "entertainment",
    "vlog",
    "music",
    "news",
    "social",
];

/// Domains that strongly indicate learning content.
pub static LEARNING_DOMAINS: &[&str] = &[
    "github.com",
    "stackoverflow.com",
    "developer.mozilla.org",
    "docs.microsoft.com",
    "w3schools.com",
    "geeksforgeeks.org",
    "udemy.com",
    "coursera.org",
    "edx.org",
    "freecodecamp.org",
    "codecademy.com",
    "leetcode.com",
    "hackerrank.com",
    "medium.com",
    "dev.to",
    "hashnode.com",
    "css-tricks.com",
    "smashingmagazine.com",
    "sitepoint.com",
    "web.dev",
    "developer.chrome.com",
    "reactjs.org",
    "vuejs.org",
    "angular.io",
    "nodejs.org",
    "expressjs.com",
    "mongodb.com/docs",
    "postgresql.org/docs",
    "redis.io/docs",
    "docker.com/docs",
    "kubernetes.io/docs",
];

/// Domains excluded with high confidence regardless of title.
pub static NON_LEARNING_DOMAINS: &[&str] = &[
    "mail.google.com",
    "calendar.google.com",
    "drive.google.com",
    "chat.google.com",
    "meet.google.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com/feed",
    "reddit.com/r/",
    "youtube.com/watch",
    "netflix.com",
    "spotify.com",
    "amazon.com",
    "ebay.com",
    "wikipedia.org/wiki/List",
    "wikipedia.org/wiki/Category",
];

/// Known video platform domains.
pub static VIDEO_PLATFORMS: &[&str] = &[
    "youtube.com",
    "vimeo.com",
    "udemy.com",
    "coursera.org",
    "edx.org",
    "pluralsight.com",
    "linkedin.com/learning",
    "skillshare.com",
    "khanacademy.org",
    "freecodecamp.org/videos",
    "egghead.io",
    "frontendmasters.com",
    "scrimba.com",
    "codecademy.com/videos",
    "teamtreehouse.com",
    "lynda.com",
    "udacity.com",
    "datacamp.com",
    "brilliant.org",
    "masterclass.com",
];

/// Title/URL patterns that indicate learning intent.
pub static LEARNING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)tutorial",
        r"(?i)guide",
        r"(?i)documentation",
        r"(?i)learn",
        r"(?i)course",
        r"(?i)lesson",
        r"(?i)how-to",
        r"(?i)getting-started",
        r"(?i)examples?",
        r"(?i)reference",
        r"(?i)api",
        r"(?i)docs?",
        r"(?i)manual",
        r"(?i)handbook",
        r"(?i)book",
        r"(?i)article",
        r"(?i)blog",
        r"(?i)post",
        r"(?i)explanation",
        r"(?i)overview",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex: learning pattern"))
    .collect()
});

/// URL path patterns excluded with high confidence (account and commerce
/// flows).
pub static NON_LEARNING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^https?://[^/]+/login",
        r"(?i)^https?://[^/]+/signup",
        r"(?i)^https?://[^/]+/account",
        r"(?i)^https?://[^/]+/profile",
        r"(?i)^https?://[^/]+/settings",
        r"(?i)^https?://[^/]+/cart",
        r"(?i)^https?://[^/]+/checkout",
        r"(?i)^https?://[^/]+/payment",
        r"(?i)^https?://[^/]+/order",
        r"(?i)^https?://[^/]+/shipping",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex: non-learning pattern"))
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(LEARNING_PATTERNS.len(), 20);
        assert_eq!(NON_LEARNING_PATTERNS.len(), 10);
    }

    #[test]
    fn test_category_order() {
        let keys: Vec<&str> = CATEGORIES.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["programming", "web", "data", "devops", "ai"]);
    }

    #[test]
    fn test_non_learning_pattern_anchors_to_path() {
        let checkout = &NON_LEARNING_PATTERNS[6];
        assert!(checkout.is_match("https://amazon.com/checkout"));
        // Only the first path segment is excluded, not arbitrary mentions
        assert!(!checkout.is_match("https://example.com/blog/checkout-flows"));
    }

    #[test]
    fn test_excluded_terms_disjoint_from_category_tags() {
        for category in CATEGORIES {
            for tag in category.tags {
                assert!(!EXCLUDED_TERMS.contains(tag));
            }
        }
    }
}

// src/upstream/mod.rs
//! Upstream news provider seam: the canonical article shape, the failure
//! taxonomy, and the `NewsSource` trait the pipeline calls through. The
//! reqwest-backed client lives in [`newsapi`]; tests inject doubles through
//! the same trait.

pub mod newsapi;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::validate::NewsQuery;

/// Canonical article shape returned to callers. `source` is flattened from
/// the provider's `{ name }` wrapper; `publishedAt` stays an opaque
/// ISO-8601 string and is never reparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub source: String,
    pub author: String,
    pub published_at: String,
    pub url: String,
}

/// Successful provider fetch: mapped articles plus the provider's reported
/// total result count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedNews {
    pub news: Vec<Article>,
    pub total_results: u64,
}

/// Failure kinds surfaced by a news source. `Display` is the exact text the
/// API returns in the 500 `details` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Required credential absent; no network call was attempted.
    MissingApiKey,
    /// Provider answered but its status field was not "ok"; carries the
    /// serialized response body for diagnostic transparency.
    Upstream(String),
    /// Network, timeout, or decode failure.
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::MissingApiKey => write!(f, "Missing EXTERNAL_API_KEY"),
            FetchError::Upstream(body) => write!(f, "Failed to fetch news: {body}"),
            FetchError::Transport(msg) => write!(f, "Failed to fetch news: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A queryable news source.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, query: &NewsQuery) -> Result<FetchedNews, FetchError>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_texts_match_the_api_contract() {
        assert_eq!(FetchError::MissingApiKey.to_string(), "Missing EXTERNAL_API_KEY");
        assert_eq!(
            FetchError::Upstream(r#"{"status":"error"}"#.to_string()).to_string(),
            r#"Failed to fetch news: {"status":"error"}"#
        );
        assert_eq!(
            FetchError::Transport("connection reset".to_string()).to_string(),
            "Failed to fetch news: connection reset"
        );
    }

    #[test]
    fn article_serializes_with_camel_case_published_at() {
        let a = Article {
            title: "t".into(),
            source: "s".into(),
            author: "a".into(),
            published_at: "2025-06-01T08:00:00Z".into(),
            url: "https://example.com".into(),
        };
        let v = serde_json::to_value(&a).expect("serialize article");
        assert!(v.get("publishedAt").is_some());
        assert!(v.get("published_at").is_none());
    }
}

// src/validate.rs
//! Request validation: raw JSON body -> typed `NewsQuery`.
//!
//! Every violation is collected before returning, so a caller sees all
//! field errors at once. Unknown keys are rejected rather than ignored.
//! Defaults (`filterBy` -> publishedAt, `page` -> 1) apply only after a
//! body has validated.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TOPIC_MIN_CHARS: usize = 3;
pub const TOPIC_MAX_CHARS: usize = 64;

/// Provider sort order. Wire names match the NewsAPI `sortBy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevancy,
    Popularity,
    PublishedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "relevancy" => Some(SortBy::Relevancy),
            "popularity" => Some(SortBy::Popularity),
            "publishedAt" => Some(SortBy::PublishedAt),
            _ => None,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated query. Never constructed except via [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub topic: String,
    pub filter_by: SortBy,
    pub page: u32,
}

impl NewsQuery {
    /// Deterministic cache key: exact concatenation, case-sensitive, no
    /// normalization of the topic.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:page{}", self.topic, self.filter_by.as_str(), self.page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Raw string value of a body field, for failed-request bookkeeping.
/// Non-string values count as absent.
pub fn raw_str<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Validate a raw request body, collecting every violation.
pub fn validate(raw: &Value) -> Result<NewsQuery, Vec<FieldError>> {
    let obj = match raw.as_object() {
        Some(o) => o,
        None => {
            return Err(vec![FieldError::new(
                "topic",
                "Topic is required and must be a string.",
            )])
        }
    };

    let mut errors = Vec::new();

    let topic = match obj.get("topic") {
        Some(Value::String(s)) => {
            let chars = s.chars().count();
            if chars < TOPIC_MIN_CHARS {
                errors.push(FieldError::new(
                    "topic",
                    "Topic is too short. Minimum 3 characters required.",
                ));
                None
            } else if chars > TOPIC_MAX_CHARS {
                errors.push(FieldError::new(
                    "topic",
                    "Topic is too long. Maximum 64 characters allowed.",
                ));
                None
            } else {
                Some(s.clone())
            }
        }
        _ => {
            errors.push(FieldError::new(
                "topic",
                "Topic is required and must be a string.",
            ));
            None
        }
    };

    let filter_by = match obj.get("filterBy") {
        Some(Value::String(s)) => match SortBy::parse(s) {
            Some(f) => Some(f),
            None => {
                errors.push(FieldError::new(
                    "filterBy",
                    "filterBy must be one of relevancy, popularity, publishedAt.",
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(
                "filterBy",
                "filterBy must be one of relevancy, popularity, publishedAt.",
            ));
            None
        }
        None => None,
    };

    let page = match obj.get("page") {
        Some(v) => match v.as_u64().filter(|p| *p >= 1).and_then(|p| u32::try_from(p).ok()) {
            Some(p) => Some(p),
            None => {
                errors.push(FieldError::new("page", "page must be a positive integer."));
                None
            }
        },
        None => None,
    };

    for key in obj.keys() {
        if key != "topic" && key != "filterBy" && key != "page" {
            errors.push(FieldError::new(
                "unknown field",
                format!("Unexpected field: {key}."),
            ));
        }
    }

    if errors.is_empty() {
        if let Some(topic) = topic {
            return Ok(NewsQuery {
                topic,
                filter_by: filter_by.unwrap_or(SortBy::PublishedAt),
                page: page.unwrap_or(1),
            });
        }
    }
    Err(errors)
}

// src/pipeline.rs
//! The request pipeline: validation, cache lookup, upstream fetch, cache
//! population, history bookkeeping, and response shaping. This is the only
//! place that sequences the components and the only boundary that decides
//! which failure a caller sees.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CachedNews, ResponseCache};
use crate::history::HistoryLog;
use crate::upstream::{Article, FetchError, NewsSource};
use crate::validate::{self, FieldError, NewsQuery};

/// Outcome of a valid, completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub from_cache: bool,
    pub total_results: u64,
    pub page: u32,
    pub news: Vec<Article>,
}

#[derive(Debug)]
pub enum NewsError {
    /// One or more field violations; the request never reached the cache.
    Invalid(Vec<FieldError>),
    /// Credential or provider failure after successful validation.
    Fetch(FetchError),
}

pub struct NewsPipeline {
    cache: Arc<ResponseCache>,
    history: Arc<HistoryLog>,
    source: Arc<dyn NewsSource>,
}

impl NewsPipeline {
    pub fn new(
        cache: Arc<ResponseCache>,
        history: Arc<HistoryLog>,
        source: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            cache,
            history,
            source,
        }
    }

    /// Run one raw request body through the pipeline.
    pub async fn handle(&self, raw: &Value) -> Result<NewsResponse, NewsError> {
        let query = match validate::validate(raw) {
            Ok(q) => q,
            Err(errors) => {
                // Rejected requests are logged with the raw body values,
                // not the defaulted ones.
                self.history.record(
                    validate::raw_str(raw, "topic"),
                    validate::raw_str(raw, "filterBy"),
                    true,
                );
                counter!("news_requests_rejected_total").increment(1);
                return Err(NewsError::Invalid(errors));
            }
        };

        let key = query.cache_key();

        if let Some(hit) = self.cache.get(&key) {
            counter!("news_cache_hits_total").increment(1);
            if hit.stale_soon {
                debug!(%key, "cache entry nearing expiry");
            }
            self.record_completed(&query);
            info!(%key, from_cache = true, "served news request");
            return Ok(NewsResponse {
                from_cache: true,
                total_results: hit.value.total_results,
                page: hit.value.page,
                news: hit.value.news,
            });
        }

        counter!("news_cache_misses_total").increment(1);

        let fetched = match self.source.fetch(&query).await {
            Ok(f) => f,
            Err(e) => {
                counter!("news_upstream_failures_total").increment(1);
                warn!(%key, provider = self.source.name(), error = %e, "upstream fetch failed");
                // Post-validation failures are surfaced, not logged to history.
                return Err(NewsError::Fetch(e));
            }
        };

        let payload = CachedNews {
            total_results: fetched.total_results,
            page: query.page,
            news: fetched.news,
        };
        self.cache.set(&key, payload.clone());
        self.record_completed(&query);
        info!(
            %key,
            from_cache = false,
            total_results = payload.total_results,
            "served news request"
        );

        Ok(NewsResponse {
            from_cache: false,
            total_results: payload.total_results,
            page: payload.page,
            news: payload.news,
        })
    }

    // Completed requests (cache hit or fresh fetch) record the effective,
    // post-default values.
    fn record_completed(&self, query: &NewsQuery) {
        self.history
            .record(Some(&query.topic), Some(query.filter_by.as_str()), false);
    }
}

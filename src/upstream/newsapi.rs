// src/upstream/newsapi.rs
//! NewsAPI client: builds the provider query, performs the call with a
//! fixed timeout, and maps the provider article shape into the canonical
//! one. Mapping preserves article order and count exactly.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Article, FetchError, FetchedNews, NewsSource};
use crate::config::AppConfig;
use crate::validate::NewsQuery;

pub const BASE_URL: &str = "https://newsapi.org/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_millis(5_000);
const LANGUAGE: &str = "en";
const PAGE_SIZE: u32 = 5;

pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(config: &AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("news-proxy/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (local stubs in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Provider wire shapes. Missing fields decode to empty strings so one
// sparse article does not fail the whole page.
#[derive(Debug, Deserialize)]
struct ProviderBody {
    #[serde(rename = "totalResults", default)]
    total_results: u64,
    #[serde(default)]
    news: Vec<ProviderArticle>,
}

#[derive(Debug, Deserialize)]
struct ProviderArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    source: ProviderSource,
    #[serde(default)]
    author: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderSource {
    #[serde(default)]
    name: String,
}

fn map_articles(articles: Vec<ProviderArticle>) -> Vec<Article> {
    articles
        .into_iter()
        .map(|a| Article {
            title: a.title,
            source: a.source.name,
            author: a.author,
            published_at: a.published_at,
            url: a.url,
        })
        .collect()
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(&self, query: &NewsQuery) -> Result<FetchedNews, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        debug!(
            topic = %query.topic,
            filter_by = %query.filter_by,
            page = query.page,
            "fetching news from provider"
        );

        let url = format!("{}/everything", self.base_url);
        let page_size = PAGE_SIZE.to_string();
        let page = query.page.to_string();

        let t0 = Instant::now();
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", query.topic.as_str()),
                ("sortBy", query.filter_by.as_str()),
                ("language", LANGUAGE),
                ("pageSize", page_size.as_str()),
                ("page", page.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        histogram!("news_upstream_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        if body.get("status").and_then(Value::as_str) != Some("ok") {
            return Err(FetchError::Upstream(body.to_string()));
        }

        let parsed: ProviderBody =
            serde_json::from_value(body).map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(FetchedNews {
            news: map_articles(parsed.news),
            total_results: parsed.total_results,
        })
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

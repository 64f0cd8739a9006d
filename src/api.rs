//! HTTP access to the news source.
//!
//! This module provides the seam between the dashboard and the remote news
//! API:
//! - [`NewsSource`]: core trait for fetching one page of results
//! - [`NewsDataClient`]: `reqwest` implementation against a newsdata.io-style endpoint
//!
//! Implementations report failures as [`FetchError`]. Turning those into an
//! empty page is the orchestrator's job (see [`crate::fetch`]), not the
//! client's.

use crate::errors::FetchError;
use crate::models::{FetchQuery, NewsResponse};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Default news endpoint; the query string is appended per request.
pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsdata.io/api/1/latest";

/// Trait for fetching one page of news.
///
/// Implementors send a single request for the given query and return the
/// decoded response. This abstraction lets the orchestrator run against the
/// real API or an in-memory source.
pub trait NewsSource {
    /// Fetch one page of results for `query`.
    async fn fetch_page(&self, query: &FetchQuery) -> Result<NewsResponse, FetchError>;
}

/// News client backed by `reqwest`.
pub struct NewsDataClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl NewsDataClient {
    /// Create a client for `endpoint` authenticating with `api_key`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL without a query string
    /// * `api_key` - Key sent as the `apiKey` parameter
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Build the request URL for `query`.
    ///
    /// The topic is percent-encoded; the page token is appended verbatim
    /// because the source hands it out ready to echo back.
    pub fn request_url(&self, query: &FetchQuery) -> String {
        let mut url = format!(
            "{}?q={}&language={}&apiKey={}",
            self.endpoint.trim_end_matches('?'),
            encode(&query.topic),
            query.language.code(),
            encode(&self.api_key)
        );
        if let Some(page) = &query.page {
            url.push_str("&page=");
            url.push_str(page);
        }
        url
    }
}

impl fmt::Debug for NewsDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsDataClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl NewsSource for NewsDataClient {
    #[instrument(level = "info", skip_all, fields(topic = %query.topic, language = %query.language, page = ?query.page))]
    async fn fetch_page(&self, query: &FetchQuery) -> Result<NewsResponse, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(self.request_url(query)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u128,
                body_preview = %truncate_for_log(&body, 300),
                "News source rejected request"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: NewsResponse = serde_json::from_str(&body)?;
        debug!(
            elapsed_ms = dt.as_millis() as u128,
            count = parsed.results.as_ref().map_or(0, Vec::len),
            next_page = ?parsed.next_page,
            "News page received"
        );
        Ok(parsed)
    }
}

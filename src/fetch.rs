//! Fetch orchestration: single-language pages and the mixed-language fan-out.
//!
//! Both entry points are fail-soft. A network, status or parse failure is
//! logged here and becomes an empty page; callers never see an error value.
//! [`FetchOutcome::degraded`] records that it happened so the dashboard can
//! leave its session state alone.

use crate::api::NewsSource;
use crate::errors::FetchError;
use crate::language::Language;
use crate::models::{ArticleRecord, FetchQuery};
use crate::utils::looks_truncated;
use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

/// Result of one single-language fetch after failure handling.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Normalized articles in the order the source returned them.
    pub articles: Vec<ArticleRecord>,
    /// Continuation token for the next page, if the source offered one.
    pub next_page: Option<String>,
    /// True when the request failed and this outcome is the empty fallback.
    pub degraded: bool,
}

impl FetchOutcome {
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Default::default()
        }
    }
}

/// Result of a mixed-language fetch.
#[derive(Debug, Clone, Default)]
pub struct MixedOutcome {
    /// Concatenated articles, in [`Language::ALL`] order.
    pub articles: Vec<ArticleRecord>,
    /// Number of language branches that failed.
    pub failed: usize,
}

impl MixedOutcome {
    /// True when no branch succeeded.
    pub fn all_failed(&self) -> bool {
        self.failed == Language::ALL.len()
    }
}

/// Fetch one page for `query`, degrading any failure to an empty outcome.
///
/// Issues exactly one request. The returned articles are tagged with
/// `query.language`.
#[instrument(level = "info", skip_all, fields(topic = %query.topic, language = %query.language, page = ?query.page))]
pub async fn fetch_single<S: NewsSource>(source: &S, query: &FetchQuery) -> FetchOutcome {
    match source.fetch_page(query).await {
        Ok(response) => {
            let fetched_at = Utc::now();
            let articles: Vec<ArticleRecord> = response
                .results
                .unwrap_or_default()
                .into_iter()
                .map(|payload| ArticleRecord::from_payload(payload, query.language, fetched_at))
                .collect();
            info!(count = articles.len(), has_next = response.next_page.is_some(), "Fetched news page");
            FetchOutcome {
                articles,
                next_page: response.next_page,
                degraded: false,
            }
        }
        Err(e) => {
            log_fetch_failure(query, &e);
            FetchOutcome::degraded()
        }
    }
}

/// Fetch `topic` in every supported language at once and concatenate the results.
///
/// Every branch is issued before any is awaited and the call returns only
/// once all of them have settled. A failing branch contributes nothing; it
/// never affects the others. Branch page tokens are discarded: a mixed
/// result has no continuation.
///
/// The output is in [`Language::ALL`] order, then source order within each
/// language. Deduplication and shuffling are left to [`crate::aggregate`].
#[instrument(level = "info", skip(source))]
pub async fn fetch_mixed<S: NewsSource>(source: &S, topic: &str) -> MixedOutcome {
    let branches = Language::ALL.map(|language| {
        let query = FetchQuery::new(topic, language);
        async move { fetch_single(source, &query).await }
    });

    let outcomes = join_all(branches).await;
    let failed = outcomes.iter().filter(|o| o.degraded).count();
    let articles: Vec<ArticleRecord> = outcomes.into_iter().flat_map(|o| o.articles).collect();

    if failed > 0 {
        warn!(failed, total = Language::ALL.len(), "Some language branches failed");
    }
    info!(count = articles.len(), "Fetched mixed-language news");
    MixedOutcome { articles, failed }
}

fn log_fetch_failure(query: &FetchQuery, e: &FetchError) {
    match e {
        FetchError::Parse(inner) => error!(
            topic = %query.topic,
            language = %query.language,
            truncated = looks_truncated(inner),
            error = %e,
            "Error fetching the news; showing empty page"
        ),
        _ => error!(
            topic = %query.topic,
            language = %query.language,
            error = %e,
            "Error fetching the news; showing empty page"
        ),
    }
}

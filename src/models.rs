//! Data models for news articles and the queries that fetch them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsResponse`] and [`ArticlePayload`]: the news source's wire format
//! - [`ArticleRecord`]: a normalized article, tagged with the language it was fetched in
//! - [`DedupKey`]: the (title, link) identity used to collapse duplicates
//! - [`FetchQuery`]: topic, language and optional continuation token
//!
//! The wire types keep the source's field names (`pubDate`, `nextPage`), hence
//! the `#[serde(rename)]` attributes.

use crate::language::Language;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Author shown when the source lists no creator.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One page of results as returned by the news source.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NewsResponse {
    /// Article payloads; absent or null is treated as an empty page.
    #[serde(default)]
    pub results: Option<Vec<ArticlePayload>>,
    /// Opaque continuation token for the next page.
    #[serde(rename = "nextPage", default)]
    pub next_page: Option<String>,
}

/// A raw article exactly as the news source sends it.
///
/// Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArticlePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// List of author names; only the first entry is used.
    #[serde(default)]
    pub creator: Option<Vec<String>>,
    #[serde(rename = "pubDate", default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A normalized article.
///
/// Built fresh for every fetch and dropped when the next fetch replaces it.
/// `language` is the language of the request that produced the record, so the
/// speech readout never has to guess it from the text.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub description: Option<String>,
    pub language: Language,
}

/// Identity of an article for deduplication: exact (title, link) pair.
///
/// Articles missing both fields all share the key `(None, None)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: Option<String>,
    pub link: Option<String>,
}

impl ArticleRecord {
    /// Normalize a wire payload.
    ///
    /// `fetched_at` stands in for a missing or unreadable `pubDate`.
    pub fn from_payload(payload: ArticlePayload, language: Language, fetched_at: DateTime<Utc>) -> Self {
        let author = payload
            .creator
            .as_ref()
            .and_then(|c| c.first())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();

        let published_at = match payload.pub_date.as_deref() {
            Some(raw) => parse_pub_date(raw).unwrap_or_else(|| {
                debug!(raw, "Unreadable pubDate; using fetch time");
                fetched_at
            }),
            None => fetched_at,
        };

        Self {
            title: payload.title,
            link: payload.link,
            image_url: payload.image_url,
            author,
            published_at,
            description: payload.description,
            language,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            title: self.title.clone(),
            link: self.link.clone(),
        }
    }

    /// True when the article carries everything a slot needs to render:
    /// a non-empty image URL, title and description.
    pub fn is_displayable(&self) -> bool {
        [&self.image_url, &self.title, &self.description]
            .iter()
            .all(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// Parse the source's publication timestamp.
///
/// The source sends `YYYY-MM-DD HH:MM:SS` in UTC, but RFC 3339 and the `T`
/// separated form are accepted as well.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// What to ask the news source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub topic: String,
    pub language: Language,
    /// Continuation token from the previous page, echoed back verbatim.
    pub page: Option<String>,
}

impl FetchQuery {
    pub fn new(topic: impl Into<String>, language: Language) -> Self {
        Self {
            topic: topic.into(),
            language,
            page: None,
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn is_paginated(&self) -> bool {
        self.page.is_some()
    }
}

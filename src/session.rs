//! Per-dashboard session state.
//!
//! One [`SessionContext`] lives for as long as its dashboard. It records
//! what is on screen and how to continue it, and hands out the request ids
//! used to discard stale responses.

use crate::language::Language;
use crate::models::{ArticleRecord, DedupKey};
use std::collections::HashSet;

/// Default topic for the landing page and for language switches.
pub const DEFAULT_BASE_QUERY: &str = "India";

/// How the current result list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One language, possibly paginated.
    #[default]
    Single,
    /// Every language merged; never paginated.
    Mixed,
}

/// Identifier handed out when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Query of the last applied fetch; empty before the first one.
    pub current_query: String,
    pub current_language: Language,
    /// Continuation token of the last applied single-language page.
    pub next_page: Option<String>,
    pub mode: FetchMode,
    /// Topic used on startup and when switching languages.
    pub base_query: String,
    /// Keys of every article shown since the last fresh query.
    shown: HashSet<DedupKey>,
    /// What each slot currently shows.
    displayed: Vec<Option<ArticleRecord>>,
    last_issued: u64,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_QUERY)
    }
}

impl SessionContext {
    pub fn new(base_query: impl Into<String>) -> Self {
        Self {
            current_query: String::new(),
            current_language: Language::default(),
            next_page: None,
            mode: FetchMode::default(),
            base_query: base_query.into(),
            shown: HashSet::new(),
            displayed: Vec::new(),
            last_issued: 0,
        }
    }

    /// Issue a new request id. Any request issued earlier becomes stale.
    pub fn issue(&mut self) -> RequestId {
        self.last_issued += 1;
        RequestId(self.last_issued)
    }

    /// True if `id` is the most recently issued request.
    pub fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.last_issued
    }

    /// Start a fresh (non-paginated) result list.
    ///
    /// The shown-set and the page token always reset together.
    pub fn begin_fresh(&mut self, query: &str, language: Language, mode: FetchMode, next_page: Option<String>) {
        self.current_query = query.to_string();
        self.current_language = language;
        self.mode = mode;
        self.next_page = next_page;
        self.shown.clear();
    }

    /// Continue the current result list with another page.
    ///
    /// The shown-set is kept; only the token moves on.
    pub fn continue_with(&mut self, next_page: Option<String>) {
        self.next_page = next_page;
    }

    /// Record what the surface now shows and add it to the shown-set.
    pub fn record_displayed(&mut self, slots: Vec<Option<ArticleRecord>>) {
        self.shown.extend(slots.iter().flatten().map(ArticleRecord::dedup_key));
        self.displayed = slots;
    }

    #[cfg(test)]
    pub fn shown(&self) -> &HashSet<DedupKey> {
        &self.shown
    }

    pub fn displayed(&self, index: usize) -> Option<&ArticleRecord> {
        self.displayed.get(index).and_then(Option::as_ref)
    }

    /// True when "load more" has something to continue.
    pub fn can_load_more(&self) -> bool {
        self.mode == FetchMode::Single && !self.current_query.is_empty() && self.next_page.is_some()
    }
}

//! The dashboard: session context, news source and display surface wired together.
//!
//! Every user action (startup, sidebar topic, language button, "load more")
//! maps to one method here. Methods take `&self`, so a new action can start
//! while an older one is still waiting on the network. Each action takes a
//! [`RequestId`] when it is issued and applies its result only if no newer
//! action has been issued since; older results are dropped unseen.
//!
//! Lock order is always session, then surface. Neither lock is held across
//! a network call.

use crate::aggregate;
use crate::api::NewsSource;
use crate::fetch;
use crate::language::Language;
use crate::models::FetchQuery;
use crate::render::{self, DisplaySurface};
use crate::session::{FetchMode, RequestId, SessionContext};
use crate::speech::{self, AudioSink, Mood, SpeechSynthesizer};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Outcome of one dashboard action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub request: RequestId,
    /// False when a newer action superseded this one and its result was dropped.
    pub applied: bool,
    /// True when the fetch failed (for a mixed fetch, every branch) and the surface was cleared instead.
    pub degraded: bool,
    pub rendered: usize,
    pub hidden: usize,
    pub load_more_visible: bool,
}

impl RefreshReport {
    fn stale(request: RequestId) -> Self {
        Self {
            request,
            applied: false,
            degraded: false,
            rendered: 0,
            hidden: 0,
            load_more_visible: false,
        }
    }
}

pub struct Dashboard<S, D> {
    source: S,
    surface: Mutex<D>,
    session: Mutex<SessionContext>,
}

impl<S, D> Dashboard<S, D>
where
    S: NewsSource,
    D: DisplaySurface,
{
    pub fn new(source: S, surface: D, session: SessionContext) -> Self {
        Self {
            source,
            surface: Mutex::new(surface),
            session: Mutex::new(session),
        }
    }

    pub fn surface(&self) -> &Mutex<D> {
        &self.surface
    }

    /// Copy of the current session state.
    #[cfg(test)]
    pub async fn session(&self) -> SessionContext {
        self.session.lock().await.clone()
    }

    #[cfg(test)]
    pub fn into_surface(self) -> D {
        self.surface.into_inner()
    }

    /// Landing page: every language merged for the base query, behind the page loader.
    pub async fn initialize(&self) -> RefreshReport {
        let base_query = self.session.lock().await.base_query.clone();
        self.surface.lock().await.set_page_loading(true);
        let report = self.fetch_mixed(&base_query).await;
        self.surface.lock().await.set_page_loading(false);
        report
    }

    /// Sidebar action: fetch `topic` in the current language.
    pub async fn select_topic(&self, topic: &str) -> RefreshReport {
        let language = self.session.lock().await.current_language;
        self.fetch_single(topic, language, None).await
    }

    /// Language button: fetch the base query, localized, in `language`.
    pub async fn switch_language(&self, language: Language) -> RefreshReport {
        let query = {
            let session = self.session.lock().await;
            language.localize_query(&session.base_query)
        };
        self.fetch_single(&query, language, None).await
    }

    /// "Load more": fetch the next page of the current single-language query.
    ///
    /// Returns `None` without a request when there is nothing to continue,
    /// including always in mixed mode.
    pub async fn load_more(&self) -> Option<RefreshReport> {
        let (query, language, page) = {
            let session = self.session.lock().await;
            if !session.can_load_more() {
                debug!(mode = ?session.mode, "Nothing to load");
                return None;
            }
            (session.current_query.clone(), session.current_language, session.next_page.clone())
        };
        Some(self.fetch_single(&query, language, page).await)
    }

    /// Fetch one page in one language and bind it.
    ///
    /// Without `page` this starts a fresh result list and resets the
    /// shown-set. With `page` it continues the current list and the new
    /// page joins the shown-set. Either way the page is bound exactly as
    /// the source returned it.
    ///
    /// A failed fetch hides every slot and drops the continuation token,
    /// so "load more" stays off until a fetch succeeds. The query and
    /// shown-set of the last good page are kept.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_single(&self, topic: &str, language: Language, page: Option<String>) -> RefreshReport {
        let request = self.begin().await;
        let query = match page {
            Some(page) => FetchQuery::new(topic, language).with_page(page),
            None => FetchQuery::new(topic, language),
        };

        let outcome = fetch::fetch_single(&self.source, &query).await;

        let mut session = self.session.lock().await;
        if !session.is_latest(request) {
            warn!(request = request.0, "Discarding stale response");
            return RefreshReport::stale(request);
        }

        if outcome.degraded {
            session.continue_with(None);
        } else if query.is_paginated() {
            session.continue_with(outcome.next_page);
        } else {
            session.begin_fresh(topic, language, FetchMode::Single, outcome.next_page);
        }
        let load_more_visible = session.can_load_more();

        let mut surface = self.surface.lock().await;
        let bound = render::bind(&mut *surface, &outcome.articles, load_more_visible);
        let report = RefreshReport {
            request,
            applied: true,
            degraded: outcome.degraded,
            rendered: bound.rendered(),
            hidden: bound.hidden(),
            load_more_visible,
        };
        session.record_displayed(bound.slots);
        info!(rendered = report.rendered, load_more_visible, degraded = report.degraded, "Single-language page shown");
        report
    }

    /// Fetch every language at once, merge, dedupe, shuffle and bind.
    ///
    /// Mixed results never offer "load more".
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_mixed(&self, topic: &str) -> RefreshReport {
        let request = self.begin().await;
        let merged = fetch::fetch_mixed(&self.source, topic).await;
        let degraded = merged.all_failed();

        let mut session = self.session.lock().await;
        if !session.is_latest(request) {
            warn!(request = request.0, "Discarding stale response");
            return RefreshReport::stale(request);
        }

        let articles = aggregate::prepare_mixed(merged.articles, &mut rand::rng());
        let language = session.current_language;
        session.begin_fresh(topic, language, FetchMode::Mixed, None);

        let mut surface = self.surface.lock().await;
        let bound = render::bind(&mut *surface, &articles, false);
        let report = RefreshReport {
            request,
            applied: true,
            degraded,
            rendered: bound.rendered(),
            hidden: bound.hidden(),
            load_more_visible: false,
        };
        session.record_displayed(bound.slots);
        info!(unique = articles.len(), rendered = report.rendered, degraded, "Mixed-language page shown");
        report
    }

    /// Read the description of the article in slot `index` aloud.
    ///
    /// Returns `false` if the slot is empty or the readout failed.
    pub async fn speak_slot<T, A>(&self, index: usize, mood: Mood, synthesizer: &T, sink: &A) -> bool
    where
        T: SpeechSynthesizer,
        A: AudioSink,
    {
        let article = self.session.lock().await.displayed(index).cloned();
        let Some(article) = article else {
            warn!(index, "No article in slot; nothing to read");
            return false;
        };
        let text = article.description.as_deref().unwrap_or_default();
        let label = format!("slot-{index}-{mood}");
        speech::read_aloud(synthesizer, sink, text, Some(article.language), mood, &label).await
    }

    /// Issue a request id and switch the slot loaders on.
    async fn begin(&self) -> RequestId {
        let request = self.session.lock().await.issue();
        render::set_all_loading(&mut *self.surface.lock().await, true);
        debug!(request = request.0, "Issued request");
        request
    }
}

//! Slot binding: laying an article list onto the fixed display surface.
//!
//! The surface is a bounded sink. It exposes exactly
//! [`DisplaySurface::capacity`] slots and slot `i` shows the `i`-th article
//! of the list, so anything past the capacity is dropped rather than queued.
//!
//! Dates and times are always shown on Indian Standard Time, whatever the
//! language of the article.

use crate::models::ArticleRecord;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::debug;

/// Number of slots on a standard dashboard page.
pub const DEFAULT_SLOT_CAPACITY: usize = 12;

/// Link used when an article has a title but no URL.
const FALLBACK_LINK: &str = "#";

/// Asia/Kolkata. IST has no daylight saving, so a fixed offset is exact.
const IST: FixedOffset = match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
    Some(offset) => offset,
    None => panic!("IST offset out of range"),
};

/// Everything a slot shows for one article, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotContent {
    pub image_url: String,
    pub title: String,
    pub link: String,
    pub author: String,
    /// e.g. `6 May 2025`
    pub date: String,
    /// e.g. `01:45 pm`
    pub time: String,
    pub description: String,
}

impl SlotContent {
    /// Format `record` for display, or `None` if it lacks an image, title or description.
    pub fn from_record(record: &ArticleRecord) -> Option<Self> {
        if !record.is_displayable() {
            return None;
        }
        Some(Self {
            image_url: record.image_url.clone()?,
            title: record.title.clone()?,
            link: record
                .link
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| FALLBACK_LINK.to_string()),
            author: record.author.clone(),
            date: format_display_date(record.published_at),
            time: format_display_time(record.published_at),
            description: record.description.clone()?,
        })
    }
}

/// The rendering target the dashboard writes into.
///
/// Implementations own their slots; the binder only says what each one
/// should show.
pub trait DisplaySurface {
    /// Number of slots. Fixed for the lifetime of the surface.
    fn capacity(&self) -> usize;

    fn show_slot(&mut self, index: usize, content: &SlotContent);

    fn hide_slot(&mut self, index: usize);

    /// Toggle the per-slot loading indicator.
    fn set_slot_loading(&mut self, index: usize, loading: bool);

    /// Toggle the shared "load more" control.
    fn set_load_more_visible(&mut self, visible: bool);

    /// Toggle the full-page loading overlay.
    fn set_page_loading(&mut self, loading: bool);
}

/// What [`bind`] did to the surface.
#[derive(Debug, Clone, Default)]
pub struct BindReport {
    /// One entry per slot: the article rendered there, or `None` if hidden.
    pub slots: Vec<Option<ArticleRecord>>,
}

impl BindReport {
    pub fn rendered(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn hidden(&self) -> usize {
        self.slots.len() - self.rendered()
    }
}

/// Turn every per-slot loading indicator on or off.
pub fn set_all_loading<D: DisplaySurface + ?Sized>(surface: &mut D, loading: bool) {
    for index in 0..surface.capacity() {
        surface.set_slot_loading(index, loading);
    }
}

/// Bind `articles` onto `surface`.
///
/// Slot `i` shows `articles[i]` when it exists and passes the display gate;
/// otherwise slot `i` is hidden. Partially populated articles are skipped,
/// not padded with placeholders, and the slot they would have used stays
/// hidden. Each slot's loader is switched off as it is bound. Finally the
/// "load more" control is set to `load_more_visible`.
pub fn bind<D: DisplaySurface + ?Sized>(surface: &mut D, articles: &[ArticleRecord], load_more_visible: bool) -> BindReport {
    let capacity = surface.capacity();
    let mut slots = Vec::with_capacity(capacity);

    for index in 0..capacity {
        let content = articles
            .get(index)
            .and_then(|article| SlotContent::from_record(article).map(|c| (article, c)));
        match content {
            Some((article, content)) => {
                surface.show_slot(index, &content);
                slots.push(Some(article.clone()));
            }
            None => {
                surface.hide_slot(index);
                slots.push(None);
            }
        }
        surface.set_slot_loading(index, false);
    }

    surface.set_load_more_visible(load_more_visible);

    let report = BindReport { slots };
    debug!(
        capacity,
        offered = articles.len(),
        rendered = report.rendered(),
        hidden = report.hidden(),
        load_more_visible,
        "Bound articles to slots"
    );
    report
}

/// Long-form date on IST, e.g. `6 May 2025`.
pub fn format_display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&IST).format("%-d %B %Y").to_string()
}

/// Two-digit 12-hour time on IST, e.g. `01:45 pm`.
pub fn format_display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&IST).format("%I:%M %P").to_string()
}

//! Text rendering of the slot board for the terminal.
//!
//! [`TerminalSurface`] only records state; [`TerminalSurface::render_board`]
//! turns it into text when the caller wants to print it. Loader toggles are
//! logged at debug level, since a finished board never shows them.

use crate::render::{DisplaySurface, SlotContent};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TerminalSurface {
    slots: Vec<Option<SlotContent>>,
    loading: Vec<bool>,
    load_more_visible: bool,
}

impl TerminalSurface {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            loading: vec![false; capacity],
            load_more_visible: false,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Render visible slots in order, followed by the "load more" hint.
    pub fn render_board(&self) -> String {
        let mut out = String::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if self.loading[index] {
                let _ = writeln!(out, "[{}] loading…", index);
                continue;
            }
            let Some(c) = slot else { continue };
            let _ = writeln!(out, "[{}] {}", index, c.title);
            let _ = writeln!(out, "    {} | {} {}", c.author, c.date, c.time);
            let _ = writeln!(out, "    {}", c.description);
            let _ = writeln!(out, "    {}", c.link);
            let _ = writeln!(out, "    image: {}", c.image_url);
            out.push('\n');
        }
        if self.visible_count() == 0 {
            out.push_str("(no articles)\n");
        }
        if self.load_more_visible {
            out.push_str("-- more available: run again with --pages N --\n");
        }
        out
    }
}

impl DisplaySurface for TerminalSurface {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn show_slot(&mut self, index: usize, content: &SlotContent) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(content.clone());
        }
    }

    fn hide_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    fn set_slot_loading(&mut self, index: usize, loading: bool) {
        if let Some(flag) = self.loading.get_mut(index) {
            *flag = loading;
        }
    }

    fn set_load_more_visible(&mut self, visible: bool) {
        self.load_more_visible = visible;
    }

    fn set_page_loading(&mut self, loading: bool) {
        debug!(loading, "Page loader");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(title: &str) -> SlotContent {
        SlotContent {
            image_url: "https://img.example.com/x.jpg".into(),
            title: title.into(),
            link: "https://example.com/x".into(),
            author: "Unknown".into(),
            date: "6 May 2025".into(),
            time: "01:45 pm".into(),
            description: "Something happened.".into(),
        }
    }

    #[test]
    fn test_render_board_lists_visible_slots() {
        let mut surface = TerminalSurface::new(3);
        surface.show_slot(0, &content("First"));
        surface.show_slot(2, &content("Third"));
        surface.set_load_more_visible(true);

        let board = surface.render_board();
        assert!(board.contains("[0] First"));
        assert!(board.contains("[2] Third"));
        assert!(!board.contains("[1]"));
        assert!(board.contains("Unknown | 6 May 2025 01:45 pm"));
        assert!(board.contains("more available"));
    }

    #[test]
    fn test_render_board_empty() {
        let mut surface = TerminalSurface::new(2);
        surface.show_slot(1, &content("Gone"));
        surface.hide_slot(1);
        assert_eq!(surface.render_board(), "(no articles)\n");
    }

    #[test]
    fn test_out_of_range_slots_are_ignored() {
        let mut surface = TerminalSurface::new(1);
        surface.show_slot(5, &content("Nope"));
        surface.set_slot_loading(5, true);
        assert_eq!(surface.visible_count(), 0);
    }

    #[test]
    fn test_loading_slots_render_placeholder() {
        let mut surface = TerminalSurface::new(2);
        surface.set_slot_loading(1, true);
        assert!(surface.render_board().starts_with("[1] loading…"));
    }
}

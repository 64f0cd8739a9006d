//! Utility functions for log formatting, JSON error classification and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging response bodies and article text
//! - JSON error detection for telling cut-off bodies from malformed ones
//! - File system validation for the audio output directory

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` bytes (backed off to the nearest char
/// boundary, since article text is often Devanagari) with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// A body that stops mid-document fails with an EOF error, which usually
/// points at the connection rather than at the source's schema.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Create the audio directory if needed and prove we can write into it.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe = Path::new(path).join(".newsdeck-probe");
    fs::write(&probe, b"").await?;
    fs::remove_file(&probe).await?;
    info!("Audio directory is writable");
    Ok(())
}

//! The fixed set of languages the dashboard fetches and reads aloud.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Localized form of the default base query, used for Devanagari languages.
const INDIA_DEVANAGARI: &str = "भारत";

/// A news language supported by the dashboard.
///
/// Mixed-language fetches walk [`Language::ALL`] in order, so that order is
/// also the merge order of the combined result list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "en")]
    #[serde(rename = "en")]
    English,
    #[value(name = "hi")]
    #[serde(rename = "hi")]
    Hindi,
    #[value(name = "mr")]
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    /// Code sent as the `language` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
        }
    }

    /// BCP-47 tag passed to the speech service.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
            Language::Marathi => "mr-IN",
        }
    }

    /// Rewrite the base query for this language.
    ///
    /// Hindi and Marathi sources index the country under its Devanagari
    /// name, so a base query of "India" (any case) becomes "भारत". Every
    /// other query is passed through unchanged.
    pub fn localize_query(self, base_query: &str) -> String {
        match self {
            Language::Hindi | Language::Marathi if base_query.eq_ignore_ascii_case("india") => {
                INDIA_DEVANAGARI.to_string()
            }
            _ => base_query.to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

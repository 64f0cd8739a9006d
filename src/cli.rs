//! Command-line interface definitions for newsdeck.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can also be provided via environment variables, and every
//! setting except the action flags can come from a YAML file (see
//! [`crate::config`]).

use crate::language::Language;
use clap::Parser;

/// Command-line arguments for newsdeck.
///
/// With no action flags the landing page is shown: the base query in every
/// language, merged and shuffled.
///
/// # Examples
///
/// ```sh
/// # Landing page (mixed languages)
/// newsdeck --news-api-key YOUR_KEY
///
/// # Sports in Hindi, plus two more pages
/// newsdeck --topic Sports --language hi --pages 2
///
/// # Read slot 0 aloud in a calm voice
/// newsdeck --language mr --speak 0 --mood calm --audio-dir ./audio
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a settings YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News API key
    #[arg(long, env = "NEWSDATA_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Speech-synthesis API key
    #[arg(long, env = "TTS_API_KEY", hide_env_values = true)]
    pub speech_api_key: Option<String>,

    /// Override the news endpoint
    #[arg(long)]
    pub news_endpoint: Option<String>,

    /// Override the speech-synthesis endpoint
    #[arg(long)]
    pub speech_endpoint: Option<String>,

    /// Topic to fetch (sidebar selection)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Language to fetch in; without --topic this fetches the base query
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Merge every language for the topic instead of fetching one
    #[arg(long, conflicts_with = "language")]
    pub mixed: bool,

    /// Topic used for the landing page and language switches
    #[arg(long)]
    pub base_query: Option<String>,

    /// Number of extra pages to load after the first ("load more")
    #[arg(short, long, default_value_t = 0)]
    pub pages: usize,

    /// Number of display slots
    #[arg(long)]
    pub slots: Option<usize>,

    /// Read the article in this slot aloud
    #[arg(long)]
    pub speak: Option<usize>,

    /// Voice mood for --speak: happy, sad, angry, calm or neutral (anything else reads as neutral)
    #[arg(long, default_value = "neutral")]
    pub mood: String,

    /// Directory for readout MP3 files
    #[arg(long, default_value = "./audio")]
    pub audio_dir: String,
}

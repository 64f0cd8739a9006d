//! # newsdeck
//!
//! A news dashboard engine that fetches articles from a newsdata.io-style API
//! in one or several languages, merges and deduplicates them, and lays them
//! out onto a fixed number of display slots.
//!
//! ## Features
//!
//! - Single-language pages with "load more" pagination
//! - Mixed-language landing page: English, Hindi and Marathi fetched in
//!   parallel, deduplicated by (title, link) and shuffled
//! - Fail-soft fetching: a failed request shows an empty board, never an error
//! - Stale-response guard: only the most recent action may update the board
//! - Text-to-speech readout of any slot with mood-dependent voice settings
//!
//! ## Usage
//!
//! ```sh
//! newsdeck --news-api-key KEY --topic Sports --language hi --pages 1
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`fetch`] issues requests through an [`api::NewsSource`]
//! 2. **Aggregation**: [`aggregate`] dedupes and shuffles merged lists
//! 3. **Binding**: [`render`] writes the list onto a [`render::DisplaySurface`]
//! 4. **Session**: [`dashboard`] ties it together around a [`session::SessionContext`]

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod api;
mod cli;
mod config;
mod dashboard;
mod errors;
mod fetch;
mod language;
mod models;
mod outputs;
mod render;
mod session;
mod speech;
#[cfg(test)]
mod testing;
mod utils;

use api::NewsDataClient;
use cli::Cli;
use config::Settings;
use dashboard::{Dashboard, RefreshReport};
use outputs::{audio::FileAudioSink, terminal::TerminalSurface};
use session::SessionContext;
use speech::{GoogleTtsClient, Mood};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsdeck starting up");

    let args = Cli::parse();
    debug!(?args.topic, ?args.language, mixed = args.mixed, pages = args.pages, "Parsed CLI arguments");

    let settings = match Settings::resolve(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid settings");
            return Err(e.into());
        }
    };
    info!(slots = settings.slots, endpoint = %settings.news_endpoint, "Settings resolved");

    let api_key = settings.news_api_key.clone().unwrap_or_else(|| {
        warn!("No news API key configured; every request will come back empty");
        String::new()
    });
    let source = NewsDataClient::new(&settings.news_endpoint, api_key, settings.request_timeout())?;
    let surface = TerminalSurface::new(settings.slots);
    let dashboard = Dashboard::new(source, surface, SessionContext::new(&settings.base_query));

    // ---- First page ----
    let report = match (&args.topic, args.language, args.mixed) {
        (topic, _, true) => {
            let topic = topic.clone().unwrap_or_else(|| settings.base_query.clone());
            dashboard.fetch_mixed(&topic).await
        }
        (Some(topic), Some(language), false) => dashboard.fetch_single(topic, language, None).await,
        (Some(topic), None, false) => dashboard.select_topic(topic).await,
        (None, Some(language), false) => dashboard.switch_language(language).await,
        (None, None, false) => dashboard.initialize().await,
    };
    print_board(&dashboard, &report).await;

    // ---- Load more ----
    for page in 1..=args.pages {
        match dashboard.load_more().await {
            Some(report) if report.degraded => {
                warn!(page, "Could not load more; stopping");
                print_board(&dashboard, &report).await;
                break;
            }
            Some(report) => {
                info!(page, rendered = report.rendered, "Loaded more");
                print_board(&dashboard, &report).await;
            }
            None => {
                info!(page, "No further pages");
                break;
            }
        }
    }

    // ---- Readout ----
    if let Some(index) = args.speak {
        let mood = Mood::from_name(&args.mood);
        match &settings.speech_api_key {
            None => warn!("No speech API key configured; skipping readout"),
            Some(key) => {
                ensure_writable_dir(&args.audio_dir).await?;
                let synthesizer = GoogleTtsClient::new(&settings.speech_endpoint, key, settings.request_timeout())?;
                let sink = FileAudioSink::new(&args.audio_dir);
                if dashboard.speak_slot(index, mood, &synthesizer, &sink).await {
                    info!(index, %mood, dir = %args.audio_dir, "Readout saved");
                } else {
                    warn!(index, %mood, "Readout produced no audio");
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

async fn print_board(dashboard: &Dashboard<NewsDataClient, TerminalSurface>, report: &RefreshReport) {
    debug!(
        request = report.request.0,
        applied = report.applied,
        degraded = report.degraded,
        rendered = report.rendered,
        hidden = report.hidden,
        load_more_visible = report.load_more_visible,
        "Printing board"
    );
    let board = dashboard.surface().lock().await.render_board();
    println!("{board}");
}

//! Error types for the network boundaries and for startup configuration.
//!
//! Fetch and speech errors never reach the display layer. They are logged
//! where they happen and turned into an empty result (see
//! [`crate::fetch::fetch_single`] and [`crate::speech::read_aloud`]). Only
//! [`ConfigError`] is allowed to abort the binary.

use thiserror::Error;

/// Failure while talking to the news source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("news source returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not the JSON shape we expect.
    #[error("could not parse news response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while synthesizing or playing speech.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("speech service returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not parse speech response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("speech response carried no audio")]
    MissingAudio,

    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("could not write audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while loading settings at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid endpoint URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("slot capacity must be at least 1")]
    InvalidSlots,

    #[error("request timeout must be at least 1 second")]
    InvalidTimeout,
}

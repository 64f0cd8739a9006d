//! Text-to-speech readout of article text.
//!
//! This module provides:
//! - [`Mood`] and its fixed voice table
//! - Language selection: an explicit [`Language`] tag, with script detection as fallback
//! - [`SpeechSynthesizer`]: trait over the synthesis API, with a `reqwest` implementation
//! - [`AudioSink`]: where decoded audio goes
//! - [`read_aloud`]: the fail-soft entry point
//!
//! Readout failures are logged and swallowed. There is no retry.

use crate::errors::SpeechError;
use crate::language::Language;
use crate::utils::truncate_for_log;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use urlencoding::encode;

/// Default synthesis endpoint; the API key is appended as `?key=`.
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Any Devanagari letter from अ to ह.
static DEVANAGARI: Lazy<Regex> = Lazy::new(|| Regex::new("[\u{0905}-\u{0939}]").expect("valid regex"));

/// Common Marathi words that do not occur in Hindi.
static MARATHI_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new("माझ्या|आपले|स्वागत").expect("valid regex"));

/// Tone of a readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Calm,
    #[default]
    Neutral,
}

impl Mood {
    /// Look up a mood by name. Unknown names read as [`Mood::Neutral`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" => Mood::Happy,
            "sad" => Mood::Sad,
            "angry" => Mood::Angry,
            "calm" => Mood::Calm,
            _ => Mood::Neutral,
        }
    }

    pub fn voice_profile(self) -> VoiceProfile {
        let (pitch, speaking_rate) = match self {
            Mood::Happy => (1.0, 1.1),
            Mood::Sad => (-5.0, 0.7),
            Mood::Angry => (-4.0, 1.1),
            Mood::Calm => (0.0, 0.95),
            Mood::Neutral => (0.0, 1.0),
        };
        VoiceProfile {
            pitch,
            speaking_rate,
            gender: SsmlGender::Female,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Calm => "calm",
            Mood::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    pub pitch: f64,
    pub speaking_rate: f64,
    pub gender: SsmlGender,
}

/// Guess the speech locale from the text itself.
///
/// Devanagari text is Marathi when it contains a Marathi marker word and
/// Hindi otherwise; everything else is read as US English.
pub fn detect_locale(text: &str) -> &'static str {
    if DEVANAGARI.is_match(text) {
        if MARATHI_MARKERS.is_match(text) {
            Language::Marathi.speech_locale()
        } else {
            Language::Hindi.speech_locale()
        }
    } else {
        Language::English.speech_locale()
    }
}

/// Speech locale for `text`: the article's own language when known, otherwise a guess.
pub fn resolve_locale(text: &str, language: Option<Language>) -> &'static str {
    match language {
        Some(language) => language.speech_locale(),
        None => detect_locale(text),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelection,
    #[serde(rename = "audioConfig")]
    pub audio_config: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub ssml_gender: SsmlGender,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
    pub pitch: f64,
    pub speaking_rate: f64,
}

impl SynthesisRequest {
    /// Build the request body for `text` read in `locale` with `mood`.
    pub fn new(text: impl Into<String>, locale: &str, mood: Mood) -> Self {
        let profile = mood.voice_profile();
        Self {
            input: SynthesisInput { text: text.into() },
            voice: VoiceSelection {
                language_code: locale.to_string(),
                ssml_gender: profile.gender,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
                pitch: profile.pitch,
                speaking_rate: profile.speaking_rate,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesisResponse {
    #[serde(rename = "audioContent", default)]
    pub audio_content: Option<String>,
}

impl SynthesisResponse {
    /// Decode the base64 audio payload.
    pub fn decode_audio(&self) -> Result<Vec<u8>, SpeechError> {
        let encoded = self
            .audio_content
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(SpeechError::MissingAudio)?;
        Ok(BASE64_STANDARD.decode(encoded)?)
    }
}

/// Trait over the speech-synthesis API.
pub trait SpeechSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, SpeechError>;
}

/// Decoded audio ready to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Short name for the clip, e.g. `slot-3-calm`.
    pub label: String,
    /// MP3 bytes.
    pub bytes: Vec<u8>,
}

/// Destination for synthesized audio.
pub trait AudioSink {
    async fn play(&self, clip: &AudioClip) -> Result<(), SpeechError>;
}

/// Speech client backed by `reqwest`.
pub struct GoogleTtsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTtsClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    fn request_url(&self) -> String {
        format!("{}?key={}", self.endpoint, encode(&self.api_key))
    }
}

impl fmt::Debug for GoogleTtsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTtsClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl SpeechSynthesizer for GoogleTtsClient {
    #[instrument(level = "info", skip_all, fields(locale = %request.voice.language_code))]
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, SpeechError> {
        let t0 = Instant::now();
        let body = serde_json::to_string(request)?;
        let response = self
            .client
            .post(self.request_url())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u128,
                body_preview = %truncate_for_log(&text, 300),
                "Speech service rejected request"
            );
            return Err(SpeechError::Status {
                status: status.as_u16(),
            });
        }
        debug!(elapsed_ms = dt.as_millis() as u128, bytes = text.len(), "Speech response received");
        Ok(serde_json::from_str(&text)?)
    }
}

/// Read `text` aloud through `synthesizer` into `sink`.
///
/// Returns `true` if audio reached the sink. Blank text is ignored without a
/// request. Every failure is logged and reported as `false`.
#[instrument(level = "info", skip_all, fields(mood = %mood, label = %label))]
pub async fn read_aloud<T, A>(synthesizer: &T, sink: &A, text: &str, language: Option<Language>, mood: Mood, label: &str) -> bool
where
    T: SpeechSynthesizer,
    A: AudioSink,
{
    let text = text.trim();
    if text.is_empty() {
        debug!("Nothing to read");
        return false;
    }

    let locale = resolve_locale(text, language);
    let request = SynthesisRequest::new(text, locale, mood);
    debug!(locale, preview = %truncate_for_log(text, 80), "Requesting speech");

    let result = async {
        let response = synthesizer.synthesize(&request).await?;
        let bytes = response.decode_audio()?;
        let clip = AudioClip {
            label: label.to_string(),
            bytes,
        };
        sink.play(&clip).await?;
        Ok::<usize, SpeechError>(clip.bytes.len())
    }
    .await;

    match result {
        Ok(bytes) => {
            info!(locale, bytes, "Played readout");
            true
        }
        Err(SpeechError::MissingAudio) => {
            error!(locale, "No audio returned");
            false
        }
        Err(e) => {
            error!(locale, error = %e, "Error during speech readout");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSynthesizer, MemorySink};

    #[test]
    fn test_mood_table() {
        assert_eq!(Mood::Happy.voice_profile().pitch, 1.0);
        assert_eq!(Mood::Happy.voice_profile().speaking_rate, 1.1);
        assert_eq!(Mood::Sad.voice_profile().pitch, -5.0);
        assert_eq!(Mood::Sad.voice_profile().speaking_rate, 0.7);
        assert_eq!(Mood::Angry.voice_profile().pitch, -4.0);
        assert_eq!(Mood::Calm.voice_profile().speaking_rate, 0.95);
        assert_eq!(Mood::Neutral.voice_profile().speaking_rate, 1.0);
        assert!(
            [Mood::Happy, Mood::Sad, Mood::Angry, Mood::Calm, Mood::Neutral]
                .iter()
                .all(|m| m.voice_profile().gender == SsmlGender::Female)
        );
    }

    #[test]
    fn test_mood_from_name_defaults_to_neutral() {
        assert_eq!(Mood::from_name("happy"), Mood::Happy);
        assert_eq!(Mood::from_name(" Calm "), Mood::Calm);
        assert_eq!(Mood::from_name("excited"), Mood::Neutral);
        assert_eq!(Mood::from_name(""), Mood::Neutral);
    }

    #[test]
    fn test_detect_locale() {
        assert_eq!(detect_locale("Monsoon reaches Kerala"), "en-US");
        assert_eq!(detect_locale("भारत में मानसून"), "hi-IN");
        assert_eq!(detect_locale("आपले स्वागत आहे"), "mr-IN");
    }

    #[test]
    fn test_explicit_language_wins() {
        assert_eq!(resolve_locale("भारत में मानसून", Some(Language::Marathi)), "mr-IN");
        assert_eq!(resolve_locale("plain text", None), "en-US");
    }

    #[test]
    fn test_request_body_shape() {
        let request = SynthesisRequest::new("hello", "en-US", Mood::Sad);
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"]["text"], "hello");
        assert_eq!(json["voice"]["languageCode"], "en-US");
        assert_eq!(json["voice"]["ssmlGender"], "FEMALE");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
        assert_eq!(json["audioConfig"]["pitch"], -5.0);
        assert_eq!(json["audioConfig"]["speakingRate"], 0.7);
    }

    #[test]
    fn test_decode_audio() {
        let response = SynthesisResponse {
            audio_content: Some(BASE64_STANDARD.encode(b"ID3fake")),
        };
        assert_eq!(response.decode_audio().unwrap(), b"ID3fake");

        let empty = SynthesisResponse::default();
        assert!(matches!(empty.decode_audio(), Err(SpeechError::MissingAudio)));

        let garbage = SynthesisResponse {
            audio_content: Some("not base64!!".into()),
        };
        assert!(matches!(garbage.decode_audio(), Err(SpeechError::Decode(_))));
    }

    #[tokio::test]
    async fn test_read_aloud_plays_audio() {
        let synth = FakeSynthesizer::returning(b"mp3-bytes");
        let sink = MemorySink::default();

        let played = read_aloud(&synth, &sink, "  आपले स्वागत  ", None, Mood::Happy, "slot-0-happy").await;
        assert!(played);

        let requests = synth.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].input.text, "आपले स्वागत");
        assert_eq!(requests[0].voice.language_code, "mr-IN");
        assert_eq!(requests[0].audio_config.speaking_rate, 1.1);

        let clips = sink.clips();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].label, "slot-0-happy");
        assert_eq!(clips[0].bytes, b"mp3-bytes");
    }

    #[tokio::test]
    async fn test_read_aloud_swallows_failures() {
        let sink = MemorySink::default();

        let synth = FakeSynthesizer::failing();
        assert!(!read_aloud(&synth, &sink, "text", None, Mood::Calm, "x").await);

        let synth = FakeSynthesizer::silent();
        assert!(!read_aloud(&synth, &sink, "text", None, Mood::Calm, "x").await);

        assert!(sink.clips().is_empty());
    }

    #[tokio::test]
    async fn test_read_aloud_ignores_blank_text() {
        let synth = FakeSynthesizer::returning(b"x");
        let sink = MemorySink::default();
        assert!(!read_aloud(&synth, &sink, "   ", Some(Language::English), Mood::Neutral, "x").await);
        assert!(synth.requests().is_empty());
    }
}

//! In-memory fakes for the network and display seams, shared by unit tests.

use crate::api::NewsSource;
use crate::errors::{FetchError, SpeechError};
use crate::language::Language;
use crate::models::{ArticlePayload, ArticleRecord, FetchQuery, NewsResponse};
use crate::render::{DisplaySurface, SlotContent};
use crate::speech::{AudioClip, AudioSink, SpeechSynthesizer, SynthesisRequest, SynthesisResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A payload that passes the display gate.
pub fn payload(title: &str, link: &str) -> ArticlePayload {
    ArticlePayload {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        image_url: Some(format!("https://img.example.com/{link}.jpg")),
        creator: Some(vec!["Staff Reporter".to_string()]),
        pub_date: Some("2025-05-06 08:15:00".to_string()),
        description: Some(format!("About {title}")),
    }
}

/// A displayable English record.
pub fn record(title: &str, link: &str) -> ArticleRecord {
    let fetched_at = Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap();
    ArticleRecord::from_payload(payload(title, link), Language::English, fetched_at)
}

type PageKey = (String, Language, Option<String>);

#[derive(Clone)]
enum Reply {
    Page {
        results: Vec<ArticlePayload>,
        next_page: Option<String>,
    },
    Fail,
    Malformed,
}

/// Scripted news source. Unscripted queries return an empty page.
#[derive(Default)]
pub struct FakeSource {
    replies: HashMap<PageKey, Reply>,
    gates: HashMap<PageKey, Arc<Notify>>,
    requests: Mutex<Vec<FetchQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(topic: &str, language: Language, page: Option<&str>) -> PageKey {
        (topic.to_string(), language, page.map(str::to_string))
    }

    pub fn page(
        mut self,
        topic: &str,
        language: Language,
        page: Option<&str>,
        results: Vec<ArticlePayload>,
        next_page: Option<&str>,
    ) -> Self {
        self.replies.insert(
            Self::key(topic, language, page),
            Reply::Page {
                results,
                next_page: next_page.map(str::to_string),
            },
        );
        self
    }

    pub fn failing(mut self, topic: &str, language: Language) -> Self {
        self.replies.insert(Self::key(topic, language, None), Reply::Fail);
        self
    }

    pub fn malformed(mut self, topic: &str, language: Language) -> Self {
        self.replies.insert(Self::key(topic, language, None), Reply::Malformed);
        self
    }

    /// Hold the reply for this query until the returned handle is notified.
    pub fn gated(mut self, topic: &str, language: Language) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(Self::key(topic, language, None), gate.clone());
        (self, gate)
    }

    pub fn requests(&self) -> Vec<FetchQuery> {
        self.requests.lock().unwrap().clone()
    }
}

impl NewsSource for FakeSource {
    async fn fetch_page(&self, query: &FetchQuery) -> Result<NewsResponse, FetchError> {
        self.requests.lock().unwrap().push(query.clone());
        let key = Self::key(&query.topic, query.language, query.page.as_deref());

        if let Some(gate) = self.gates.get(&key).cloned() {
            gate.notified().await;
        }

        match self.replies.get(&key).cloned() {
            Some(Reply::Page { results, next_page }) => Ok(NewsResponse {
                results: Some(results),
                next_page,
            }),
            Some(Reply::Fail) => Err(FetchError::Status { status: 503 }),
            Some(Reply::Malformed) => {
                let err = serde_json::from_str::<NewsResponse>("{\"results\": [").unwrap_err();
                Err(FetchError::Parse(err))
            }
            None => Ok(NewsResponse::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotView {
    Hidden,
    Shown(SlotContent),
}

/// Display surface that records every instruction it receives.
pub struct RecordingSurface {
    pub slots: Vec<SlotView>,
    pub loading: Vec<bool>,
    pub load_more_visible: bool,
    pub page_loading_history: Vec<bool>,
}

impl RecordingSurface {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![SlotView::Hidden; capacity],
            loading: vec![false; capacity],
            load_more_visible: false,
            page_loading_history: Vec::new(),
        }
    }

    pub fn slot(&self, index: usize) -> &SlotView {
        &self.slots[index]
    }

    pub fn rendered_titles(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|s| match s {
                SlotView::Shown(c) => Some(c.title.clone()),
                SlotView::Hidden => None,
            })
            .collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn show_slot(&mut self, index: usize, content: &SlotContent) {
        self.slots[index] = SlotView::Shown(content.clone());
    }

    fn hide_slot(&mut self, index: usize) {
        self.slots[index] = SlotView::Hidden;
    }

    fn set_slot_loading(&mut self, index: usize, loading: bool) {
        self.loading[index] = loading;
    }

    fn set_load_more_visible(&mut self, visible: bool) {
        self.load_more_visible = visible;
    }

    fn set_page_loading(&mut self, loading: bool) {
        self.page_loading_history.push(loading);
    }
}

enum SpeechReply {
    Audio(Vec<u8>),
    Fail,
    Silent,
}

pub struct FakeSynthesizer {
    reply: SpeechReply,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl FakeSynthesizer {
    fn with(reply: SpeechReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(audio: &[u8]) -> Self {
        Self::with(SpeechReply::Audio(audio.to_vec()))
    }

    pub fn failing() -> Self {
        Self::with(SpeechReply::Fail)
    }

    /// Answers successfully but without an `audioContent` field.
    pub fn silent() -> Self {
        Self::with(SpeechReply::Silent)
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, SpeechError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            SpeechReply::Audio(bytes) => Ok(SynthesisResponse {
                audio_content: Some(BASE64_STANDARD.encode(bytes)),
            }),
            SpeechReply::Fail => Err(SpeechError::Status { status: 500 }),
            SpeechReply::Silent => Ok(SynthesisResponse::default()),
        }
    }
}

#[derive(Default)]
pub struct MemorySink {
    clips: Mutex<Vec<AudioClip>>,
}

impl MemorySink {
    pub fn clips(&self) -> Vec<AudioClip> {
        self.clips.lock().unwrap().clone()
    }
}

impl AudioSink for MemorySink {
    async fn play(&self, clip: &AudioClip) -> Result<(), SpeechError> {
        self.clips.lock().unwrap().push(clip.clone());
        Ok(())
    }
}

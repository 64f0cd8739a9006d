//! Audio "playback" for the CLI: each readout is written to `{dir}/{label}.mp3`.

use crate::errors::SpeechError;
use crate::speech::{AudioClip, AudioSink};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct FileAudioSink {
    dir: PathBuf,
}

impl FileAudioSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, clip: &AudioClip) -> PathBuf {
        self.dir.join(format!("{}.mp3", clip.label))
    }
}

impl AudioSink for FileAudioSink {
    #[instrument(level = "info", skip_all, fields(label = %clip.label))]
    async fn play(&self, clip: &AudioClip) -> Result<(), SpeechError> {
        let path = self.path_for(clip);
        fs::write(&path, &clip.bytes).await?;
        info!(path = %path.display(), bytes = clip.bytes.len(), "Wrote readout audio");
        Ok(())
    }
}

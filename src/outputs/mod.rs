//! Concrete sinks used by the command-line front end.
//!
//! # Submodules
//!
//! - [`terminal`]: a [`crate::render::DisplaySurface`] that keeps slot state and prints it as a text board
//! - [`audio`]: an [`crate::speech::AudioSink`] that writes readouts to MP3 files
//!
//! # Output Structure
//!
//! ```text
//! audio_dir/
//! ├── slot-0-neutral.mp3
//! └── slot-3-happy.mp3
//! ```

pub mod audio;
pub mod terminal;

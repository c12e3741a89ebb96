//! Caption System Module
//!
//! Everything between raw speech and burned-in captions:
//! - `models.rs`  — caption render directives and styling
//! - `mapper.rs`  — transcript segment → caption instruction mapping
//! - `formats.rs` — ASS subtitle document rendering for the burn-in filter
//! - `audio.rs`   — WAV sample loading for the whisper backend
//! - `whisper.rs` — transcriber seam and the whisper.cpp engine

pub mod audio;
mod formats;
mod mapper;
pub mod models;
pub mod whisper;

pub use formats::render_ass;
pub use mapper::map_segments;
pub use models::{Anchor, CaptionInstruction, CaptionStyle, Color, HAlign, VAlign};
pub use whisper::{SharedTranscriber, SpeechTranscriber, TranscriptSegment};

//! Speech Transcription
//!
//! Defines the transcriber seam the pipeline consumes ([`SpeechTranscriber`])
//! and the whisper.cpp backend behind it. The backend is conditionally
//! compiled under the `whisper` feature; without it a stub returns
//! [`TranscribeError::FeatureNotEnabled`].
//!
//! The model is a process-wide, resource-heavy singleton: [`SharedTranscriber`]
//! loads it on first use and serializes inference across concurrent pipeline
//! runs through a capacity-bounded admission gate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{OnceCell, Semaphore};
use tracing::info;

use crate::core::TimeSec;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// Whisper model file not found
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    /// Failed to load the model
    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    /// Failed to read audio samples
    #[error("Failed to read audio: {0}")]
    AudioReadError(String),

    /// Inference failed
    #[error("Transcription failed: {0}")]
    InferenceError(String),

    /// Whisper feature not enabled
    #[error("Whisper feature not enabled. Rebuild with --features whisper")]
    FeatureNotEnabled,
}

/// Result type for transcription operations
pub type TranscribeResult<T> = Result<T, TranscribeError>;

// =============================================================================
// Transcript Segment
// =============================================================================

/// One timed text segment produced by the transcriber.
///
/// Times are relative to the *trimmed* clip, not the original source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Transcribed text
    pub text: String,
    /// Start offset into the clip, in seconds
    pub start_sec: TimeSec,
    /// End offset into the clip, in seconds
    pub end_sec: TimeSec,
}

// =============================================================================
// Transcriber Seam
// =============================================================================

/// Speech-to-text collaborator consumed by the pipeline.
///
/// Implementations must be safe to share across concurrent runs; if the
/// backing model is not, the implementation owns the serialization (see
/// [`SharedTranscriber`]).
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribes a 16 kHz mono WAV file into ordered, timed segments.
    async fn transcribe(&self, audio_path: &Path) -> TranscribeResult<Vec<TranscriptSegment>>;
}

// =============================================================================
// Whisper Model Types
// =============================================================================

/// Available Whisper model sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhisperModel {
    /// Tiny model (~75MB) - fastest, lowest accuracy
    Tiny,
    /// Base model (~142MB) - good balance
    #[default]
    Base,
    /// Small model (~466MB) - better accuracy
    Small,
    /// Medium model (~1.5GB) - high accuracy
    Medium,
    /// Large model (~2.9GB) - highest accuracy
    Large,
}

impl WhisperModel {
    /// Returns the filename for this model size
    pub fn filename(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "ggml-tiny.bin",
            WhisperModel::Base => "ggml-base.bin",
            WhisperModel::Small => "ggml-small.bin",
            WhisperModel::Medium => "ggml-medium.bin",
            WhisperModel::Large => "ggml-large.bin",
        }
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = TranscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(TranscribeError::ModelLoadError(format!(
                "Unknown model size: {}",
                s
            ))),
        }
    }
}

/// Returns the default model directory
pub fn default_models_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipforge")
        .join("models")
}

// =============================================================================
// Whisper Engine - Feature-gated Implementation
// =============================================================================

#[cfg(feature = "whisper")]
mod engine_impl {
    use super::*;
    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    /// Whisper transcription engine backed by whisper.cpp
    pub struct WhisperEngine {
        context: WhisperContext,
    }

    impl WhisperEngine {
        /// Loads the model at `model_path` (.bin ggml format).
        pub fn new(model_path: &Path) -> TranscribeResult<Self> {
            if !model_path.exists() {
                return Err(TranscribeError::ModelNotFound(
                    model_path.to_string_lossy().to_string(),
                ));
            }

            let params = WhisperContextParameters::default();
            let context =
                WhisperContext::new_with_params(model_path.to_str().unwrap_or_default(), params)
                    .map_err(|e| TranscribeError::ModelLoadError(e.to_string()))?;

            Ok(Self { context })
        }

        /// Transcribes normalized f32 samples into ordered segments.
        pub fn transcribe(
            &self,
            samples: &[f32],
            language: Option<&str>,
        ) -> TranscribeResult<Vec<TranscriptSegment>> {
            let mut state = self
                .context
                .create_state()
                .map_err(|e| TranscribeError::InferenceError(e.to_string()))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            if let Some(lang) = language {
                if lang != "auto" {
                    params.set_language(Some(lang));
                }
            }
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, samples)
                .map_err(|e| TranscribeError::InferenceError(e.to_string()))?;

            let num_segments = state
                .full_n_segments()
                .map_err(|e| TranscribeError::InferenceError(e.to_string()))?;

            let mut segments = Vec::with_capacity(num_segments as usize);
            for i in 0..num_segments {
                // Whisper reports timestamps in centiseconds
                let start = state
                    .full_get_segment_t0(i)
                    .map_err(|e| TranscribeError::InferenceError(e.to_string()))?
                    as f64
                    / 100.0;
                let end = state
                    .full_get_segment_t1(i)
                    .map_err(|e| TranscribeError::InferenceError(e.to_string()))?
                    as f64
                    / 100.0;
                let text = state
                    .full_get_segment_text(i)
                    .map_err(|e| TranscribeError::InferenceError(e.to_string()))?;

                segments.push(TranscriptSegment {
                    text: text.trim().to_string(),
                    start_sec: start,
                    end_sec: end,
                });
            }

            Ok(segments)
        }
    }
}

#[cfg(feature = "whisper")]
pub use engine_impl::WhisperEngine;

// =============================================================================
// Stub Implementation (when whisper feature is disabled)
// =============================================================================

#[cfg(not(feature = "whisper"))]
pub struct WhisperEngine;

#[cfg(not(feature = "whisper"))]
impl WhisperEngine {
    /// Creates a new WhisperEngine (stub - returns error)
    pub fn new(_model_path: &Path) -> TranscribeResult<Self> {
        Err(TranscribeError::FeatureNotEnabled)
    }

    /// Transcribes samples (stub - returns error)
    pub fn transcribe(
        &self,
        _samples: &[f32],
        _language: Option<&str>,
    ) -> TranscribeResult<Vec<TranscriptSegment>> {
        Err(TranscribeError::FeatureNotEnabled)
    }
}

/// Checks if whisper transcription is compiled in
pub fn is_whisper_available() -> bool {
    cfg!(feature = "whisper")
}

// =============================================================================
// Shared Transcriber
// =============================================================================

/// Process-wide guarded handle to the whisper model.
///
/// The engine is loaded on first use and reused for the rest of the process
/// lifetime; the admission gate bounds how many runs may be inside inference
/// at once (default 1, serializing the one loaded model instance across
/// concurrent pipeline runs).
pub struct SharedTranscriber {
    model_path: PathBuf,
    language: Option<String>,
    engine: OnceCell<Arc<WhisperEngine>>,
    gate: Semaphore,
}

impl SharedTranscriber {
    /// Creates a handle for the model at `model_path`. The model is not
    /// loaded until the first transcription call.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            language: None,
            engine: OnceCell::new(),
            gate: Semaphore::new(1),
        }
    }

    /// Creates a handle for the default base model in the standard model dir.
    pub fn with_default_model() -> Self {
        Self::new(default_models_dir().join(WhisperModel::Base.filename()))
    }

    /// Sets a fixed transcription language (default: auto-detect)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the number of runs admitted into inference concurrently
    pub fn with_capacity(mut self, permits: usize) -> Self {
        self.gate = Semaphore::new(permits.max(1));
        self
    }

    async fn engine(&self) -> TranscribeResult<Arc<WhisperEngine>> {
        self.engine
            .get_or_try_init(|| async {
                let path = self.model_path.clone();
                info!(model = %path.display(), "loading whisper model");
                tokio::task::spawn_blocking(move || WhisperEngine::new(&path).map(Arc::new))
                    .await
                    .map_err(|e| TranscribeError::ModelLoadError(e.to_string()))?
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl SpeechTranscriber for SharedTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> TranscribeResult<Vec<TranscriptSegment>> {
        // Admission gate: one loaded model, bounded concurrent inference.
        // A closed semaphore cannot happen here; treat it as an engine error.
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| TranscribeError::InferenceError(e.to_string()))?;

        let engine = self.engine().await?;

        let samples = {
            let path = audio_path.to_path_buf();
            tokio::task::spawn_blocking(move || super::audio::load_audio_samples(&path))
                .await
                .map_err(|e| TranscribeError::AudioReadError(e.to_string()))?
                .map_err(|e| TranscribeError::AudioReadError(e.to_string()))?
        };

        let language = self.language.clone();
        tokio::task::spawn_blocking(move || engine.transcribe(&samples, language.as_deref()))
            .await
            .map_err(|e| TranscribeError::InferenceError(e.to_string()))?
    }
}

// =============================================================================
// Tests
// =============================================================================

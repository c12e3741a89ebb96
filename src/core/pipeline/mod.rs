//! Stage Pipeline Module
//!
//! Sequences the clip generation stages (Fetch → Trim → Transform →
//! Extract-Audio → Transcribe → Compose-Captions → Encode), propagating
//! progress and stage-tagged errors, and owning every temporary resource of a
//! run from acceptance to teardown.

mod progress;
mod run;

pub use progress::{NullSink, ProgressSink, TracingSink};
pub use run::ClipPipeline;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::core::captions::whisper::TranscribeError;
use crate::core::fetch::FetchError;
use crate::core::ffmpeg::FFmpegError;
use crate::core::geometry::GeometryError;
use crate::core::window::{TimeWindow, WindowError};
use crate::core::{Size2D, TimeSec};

// =============================================================================
// Stages
// =============================================================================

/// One sequential unit of work in the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Fetch,
    Trim,
    Transform,
    ExtractAudio,
    Transcribe,
    ComposeCaptions,
    Encode,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Trim => "trim",
            Stage::Transform => "transform",
            Stage::ExtractAudio => "extract-audio",
            Stage::Transcribe => "transcribe",
            Stage::ComposeCaptions => "compose-captions",
            Stage::Encode => "encode",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Errors and Warnings
// =============================================================================

/// Stage-local failure cause
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Transcription(#[from] TranscribeError),

    #[error(transparent)]
    Engine(#[from] FFmpegError),

    #[error("Source has no video stream")]
    MissingVideoStream,

    #[error("Run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stage-tagged pipeline failure surfaced to the caller.
///
/// Callers never see raw collaborator errors; every failure carries the stage
/// it originated from.
#[derive(Error, Debug)]
#[error("Pipeline failed at {stage} stage: {cause}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub cause: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, cause: impl Into<StageError>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

/// Non-fatal signals reported alongside a successful result
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PipelineWarning {
    /// The requested window was shifted backward to fit the source
    #[serde(rename_all = "camelCase")]
    WindowClamped {
        requested_start: TimeSec,
        effective_start: TimeSec,
    },
}

// =============================================================================
// Run Artifacts
// =============================================================================

/// The fetched source video owned by a pipeline run
#[derive(Clone, Debug)]
pub struct SourceVideo {
    /// Local file path inside the run's temp directory
    pub file_path: PathBuf,
    /// Total source duration in seconds
    pub duration_sec: TimeSec,
    /// Source frame size
    pub frame_size: Size2D,
}

/// Successful result of one pipeline run
#[derive(Clone, Debug)]
pub struct ClipOutcome {
    /// Unique run ID (ULID)
    pub run_id: String,
    /// Path of the final encoded clip
    pub output_path: PathBuf,
    /// The validated source window the clip was cut from
    pub window: TimeWindow,
    /// Number of captions burned into the clip
    pub captions_burned: usize,
    /// Non-fatal signals raised during the run
    pub warnings: Vec<PipelineWarning>,
    /// Run creation timestamp (RFC3339)
    pub created_at: String,
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cooperative cancellation handle checked at every stage boundary.
///
/// Cancelling never interrupts a stage mid-flight; the run stops before the
/// next stage starts and tears down its resources like any failed run.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the run holding this handle
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Fetch.to_string(), "fetch");
        assert_eq!(Stage::ExtractAudio.to_string(), "extract-audio");
        assert_eq!(Stage::ComposeCaptions.to_string(), "compose-captions");
    }

    #[test]
    fn pipeline_error_carries_stage_and_cause() {
        let err = PipelineError::new(
            Stage::Trim,
            WindowError::SourceTooShort {
                source_duration: 20.0,
                requested_duration: 30.0,
            },
        );
        assert_eq!(err.stage, Stage::Trim);
        let message = err.to_string();
        assert!(message.contains("trim"));
        assert!(message.contains("Source too short"));
    }

    #[test]
    fn cancel_handle_is_shared() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_cancelled());
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}

//! FFmpeg Integration Module
//!
//! Provides the codec engine behind the pipeline:
//! - Source probing (duration, frame size)
//! - Time-window trimming
//! - Audio extraction for transcription
//! - Final reframe + caption burn + encode
//!
//! The pipeline consumes the [`MediaEngine`] trait; [`FFmpegRunner`] is the
//! system-FFmpeg implementation.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::config::EncodeSettings;
use super::geometry::FramePlan;
use super::window::TimeWindow;

mod detection;
mod runner;

pub use detection::{detect_system_ffmpeg, validate_ffmpeg, FFmpegInfo};
pub use runner::{
    AudioStreamInfo, EncodeProgress, FFmpegRunner, MediaInfo, VideoStreamInfo,
};

/// FFmpeg-related error types
#[derive(Debug, thiserror::Error)]
pub enum FFmpegError {
    #[error("FFmpeg not found. Please install FFmpeg and ensure it is on PATH.")]
    NotFound,

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Output path error: {0}")]
    OutputError(String),

    #[error("FFprobe error: {0}")]
    ProbeError(String),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type FFmpegResult<T> = Result<T, FFmpegError>;

/// Codec/render collaborator consumed by the pipeline.
///
/// Each method consumes one artifact and produces the next; the pipeline owns
/// all paths involved.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Probes a media file for duration and stream geometry.
    async fn probe(&self, input: &Path) -> FFmpegResult<MediaInfo>;

    /// Cuts the validated time window out of `input` into `output`.
    async fn trim(&self, input: &Path, window: &TimeWindow, output: &Path) -> FFmpegResult<()>;

    /// Extracts the audio track as 16 kHz mono PCM WAV for transcription.
    async fn extract_audio(&self, input: &Path, output: &Path) -> FFmpegResult<()>;

    /// Applies the reframe plan, burns the subtitle file (if any), and
    /// encodes the final clip. Progress updates go to `progress` when given.
    async fn render(
        &self,
        input: &Path,
        plan: &FramePlan,
        subtitles: Option<&Path>,
        settings: &EncodeSettings,
        output: &Path,
        progress: Option<mpsc::Sender<EncodeProgress>>,
    ) -> FFmpegResult<()>;
}

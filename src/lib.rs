//! ClipForge — vertical clip generation library
//!
//! Turns a horizontal video source into a vertical (9:16), captioned
//! short-form clip: fetch the source, trim a validated time window, plan the
//! center-crop reframe, transcribe the speech, burn timed captions, and
//! encode the final file.
//!
//! The heart of the crate is [`core::pipeline::ClipPipeline`], which sequences
//! the stages and owns every temporary resource of a run. The long-latency
//! collaborators (media fetcher, speech transcriber, codec engine, progress
//! sink) sit behind traits so callers can substitute their own backends.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clipforge::core::{
//!     config::{ClipRequest, PipelineConfig},
//!     fetch::YtDlpFetcher,
//!     ffmpeg::{detect_system_ffmpeg, FFmpegRunner},
//!     pipeline::{ClipPipeline, TracingSink},
//!     captions::whisper::SharedTranscriber,
//! };
//!
//! let request = ClipRequest::new("https://youtube.com/watch?v=...", 0.0, 30.0)?;
//! let runner = FFmpegRunner::new(detect_system_ffmpeg()?);
//! let pipeline = ClipPipeline::new(
//!     PipelineConfig::default(),
//!     Arc::new(YtDlpFetcher::default()),
//!     Arc::new(runner),
//!     Arc::new(SharedTranscriber::with_default_model()),
//!     Arc::new(TracingSink),
//! );
//! let outcome = pipeline.run(&request, "clip.mp4".as_ref(), None).await?;
//! ```

pub mod core;

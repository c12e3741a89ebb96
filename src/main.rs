//! ClipForge CLI
//!
//! Thin command-line front end over the clip generation pipeline: parse
//! arguments, wire up the system backends (yt-dlp, FFmpeg, whisper), run one
//! clip, and print where the result landed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clipforge::core::captions::whisper::{default_models_dir, SharedTranscriber, WhisperModel};
use clipforge::core::config::{ClipRequest, PipelineConfig};
use clipforge::core::fetch::YtDlpFetcher;
use clipforge::core::ffmpeg::{detect_system_ffmpeg, FFmpegRunner};
use clipforge::core::pipeline::{CancelHandle, ClipPipeline, TracingSink};

/// Generate a vertical, captioned short clip from a horizontal video URL
#[derive(Parser, Debug)]
#[command(name = "clipforge", version, about)]
struct Cli {
    /// Video URL (anything yt-dlp can resolve)
    url: String,

    /// Clip start within the source, in seconds
    #[arg(short, long, default_value_t = 0.0)]
    start: f64,

    /// Clip length in seconds (15-60)
    #[arg(short, long, default_value_t = 30.0)]
    duration: f64,

    /// Destination path for the final clip
    #[arg(short, long, default_value = "clip.mp4")]
    output: PathBuf,

    /// Whisper model size (tiny, base, small, medium, large)
    #[arg(long, default_value = "base")]
    model: WhisperModel,

    /// Path to a ggml model file, overriding the standard model dir
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Fix the transcription language instead of auto-detecting
    #[arg(long)]
    language: Option<String>,

    /// Path to the yt-dlp binary
    #[arg(long, default_value = "yt-dlp")]
    yt_dlp: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let request = ClipRequest::new(cli.url, cli.start, cli.duration)
        .context("invalid clip request")?;

    let ffmpeg = detect_system_ffmpeg().context("FFmpeg not found on this system")?;
    info!(version = %ffmpeg.version, "using system FFmpeg");

    let model_path = cli
        .model_path
        .unwrap_or_else(|| default_models_dir().join(cli.model.filename()));
    let mut transcriber = SharedTranscriber::new(model_path);
    if let Some(language) = cli.language {
        transcriber = transcriber.with_language(language);
    }

    let pipeline = ClipPipeline::new(
        PipelineConfig::default(),
        Arc::new(YtDlpFetcher::with_binary(cli.yt_dlp)),
        Arc::new(FFmpegRunner::new(ffmpeg)),
        Arc::new(transcriber),
        Arc::new(TracingSink),
    );

    let cancel = CancelHandle::new();
    let signal_handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling at the next stage boundary");
            signal_handle.cancel();
        }
    });

    let outcome = pipeline.run(&request, &cli.output, Some(cancel)).await?;

    for warning in &outcome.warnings {
        warn!(?warning, "pipeline warning");
    }
    info!(
        run_id = %outcome.run_id,
        captions = outcome.captions_burned,
        "clip written to {}",
        outcome.output_path.display()
    );

    Ok(())
}

//! FFmpeg Runner Module
//!
//! Executes the FFmpeg commands behind the pipeline stages: probing, window
//! trimming, audio extraction, and the final reframe/burn/encode pass.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::captions::audio::WHISPER_SAMPLE_RATE;
use crate::core::config::EncodeSettings;
use crate::core::geometry::FramePlan;
use crate::core::window::TimeWindow;

use super::{FFmpegError, FFmpegInfo, FFmpegResult, MediaEngine};

// =============================================================================
// Types
// =============================================================================

/// Progress of a long-running encode
#[derive(Debug, Clone)]
pub struct EncodeProgress {
    /// Current frame number
    pub frame: u64,
    /// Current processing speed (fps)
    pub fps: f32,
    /// Current time position. The total duration is not known at this level;
    /// the receiver scales against the clip length.
    pub time_sec: f64,
}

/// Media information extracted by FFprobe
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration_sec: f64,
    /// Video stream info (if present)
    pub video: Option<VideoStreamInfo>,
    /// Audio stream info (if present)
    pub audio: Option<AudioStreamInfo>,
}

/// Video stream information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoStreamInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate (frames per second)
    pub fps: f64,
}

/// Audio stream information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AudioStreamInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u8,
}

// =============================================================================
// Runner
// =============================================================================

/// FFmpeg-backed codec engine
#[derive(Clone)]
pub struct FFmpegRunner {
    info: Arc<FFmpegInfo>,
}

impl FFmpegRunner {
    /// Create a new runner from a detected FFmpeg installation
    pub fn new(info: FFmpegInfo) -> Self {
        Self {
            info: Arc::new(info),
        }
    }

    /// Get the FFmpeg info
    pub fn info(&self) -> &FFmpegInfo {
        &self.info
    }

    fn check_input(input: &Path) -> FFmpegResult<()> {
        if !input.exists() {
            return Err(FFmpegError::InvalidInput(format!(
                "Input file does not exist: {}",
                input.display()
            )));
        }
        Ok(())
    }

    fn ensure_output_dir(output: &Path) -> FFmpegResult<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FFmpegError::OutputError(format!("Failed to create output directory: {}", e))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaEngine for FFmpegRunner {
    async fn probe(&self, input: &Path) -> FFmpegResult<MediaInfo> {
        Self::check_input(input)?;

        let output = tokio::process::Command::new(&self.info.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                &input.to_string_lossy(),
            ])
            .output()
            .await
            .map_err(FFmpegError::ProcessError)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FFmpegError::ProbeError(format!(
                "FFprobe failed: {}",
                stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&json_str)
    }

    async fn trim(&self, input: &Path, window: &TimeWindow, output: &Path) -> FFmpegResult<()> {
        Self::check_input(input)?;
        Self::ensure_output_dir(output)?;

        // -ss before -i for fast seeking. Re-encode rather than stream copy:
        // copy snaps to keyframes and would skew the clip-local caption times.
        let result = tokio::process::Command::new(&self.info.ffmpeg_path)
            .args([
                "-ss",
                &format!("{:.3}", window.effective_start),
                "-i",
                &input.to_string_lossy(),
                "-t",
                &format!("{:.3}", window.duration()),
                "-c:v",
                "libx264",
                "-preset",
                "veryfast",
                "-crf",
                "18",
                "-c:a",
                "aac",
                "-y",
                &output.to_string_lossy(),
            ])
            .output()
            .await
            .map_err(FFmpegError::ProcessError)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FFmpegError::ExecutionFailed(format!(
                "Trim failed: {}",
                stderr
            )));
        }

        Ok(())
    }

    async fn extract_audio(&self, input: &Path, output: &Path) -> FFmpegResult<()> {
        Self::check_input(input)?;
        Self::ensure_output_dir(output)?;

        let result = tokio::process::Command::new(&self.info.ffmpeg_path)
            .args([
                "-i",
                &input.to_string_lossy(),
                "-vn",
                "-ar",
                &WHISPER_SAMPLE_RATE.to_string(),
                "-ac",
                "1",
                "-c:a",
                "pcm_s16le",
                "-y",
                &output.to_string_lossy(),
            ])
            .output()
            .await
            .map_err(FFmpegError::ProcessError)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FFmpegError::ExecutionFailed(format!(
                "Audio extraction failed: {}",
                stderr
            )));
        }

        Ok(())
    }

    async fn render(
        &self,
        input: &Path,
        plan: &FramePlan,
        subtitles: Option<&Path>,
        settings: &EncodeSettings,
        output: &Path,
        progress: Option<mpsc::Sender<EncodeProgress>>,
    ) -> FFmpegResult<()> {
        Self::check_input(input)?;
        Self::ensure_output_dir(output)?;

        let filter = build_filter_chain(plan, subtitles);

        let mut cmd = tokio::process::Command::new(&self.info.ffmpeg_path);
        cmd.args([
            "-i",
            &input.to_string_lossy(),
            "-vf",
            &filter,
            "-c:v",
            &settings.video_codec,
            "-preset",
            &settings.preset,
            "-crf",
            &settings.crf.to_string(),
            "-r",
            &format!("{}", settings.fps),
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            &settings.audio_codec,
            "-b:a",
            &settings.audio_bitrate,
            "-movflags",
            "+faststart",
            "-progress",
            "pipe:1",
            "-y",
            &output.to_string_lossy(),
        ]);

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(FFmpegError::ProcessError)?;

        if let Some(stdout) = child.stdout.take() {
            let tx = progress;
            tokio::spawn(async move {
                use tokio::io::{AsyncBufReadExt, BufReader};
                let reader = BufReader::new(stdout);
                let mut lines = reader.lines();

                let mut current_frame = 0u64;
                let mut current_time = 0.0f64;
                let mut current_fps = 0.0f32;

                while let Ok(Some(line)) = lines.next_line().await {
                    if let Some(value) = line.strip_prefix("frame=") {
                        current_frame = value.trim().parse().unwrap_or(0);
                    } else if let Some(value) = line.strip_prefix("fps=") {
                        current_fps = value.trim().parse().unwrap_or(0.0);
                    } else if let Some(value) = line.strip_prefix("out_time_ms=") {
                        let ms: u64 = value.trim().parse().unwrap_or(0);
                        current_time = ms as f64 / 1_000_000.0;
                    } else if line.starts_with("progress=") {
                        tracing::debug!(
                            frame = current_frame,
                            time_sec = current_time,
                            fps = current_fps,
                            "encode progress"
                        );
                        if let Some(ref tx) = tx {
                            let update = EncodeProgress {
                                frame: current_frame,
                                fps: current_fps,
                                time_sec: current_time,
                            };
                            if tx.send(update).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }

        let result = child
            .wait_with_output()
            .await
            .map_err(FFmpegError::ProcessError)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FFmpegError::ExecutionFailed(format!(
                "Encode failed: {}",
                stderr
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Filter Construction
// =============================================================================

/// Builds the -vf chain: center crop, isotropic scale, optional subtitle burn.
fn build_filter_chain(plan: &FramePlan, subtitles: Option<&Path>) -> String {
    let mut filter = format!(
        "crop={}:{}:{}:{},scale={}:{}",
        plan.crop.crop_width,
        plan.crop.crop_height,
        plan.crop.x0,
        plan.crop.y0,
        plan.resize.target_width,
        plan.resize.target_height,
    );

    if let Some(path) = subtitles {
        filter.push_str(&format!(
            ",subtitles=filename='{}':charenc=UTF-8",
            escape_filter_path(path)
        ));
    }

    filter
}

/// Escapes a path for use inside a single-quoted filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

// =============================================================================
// FFprobe Parsing
// =============================================================================

/// Parse FFprobe JSON output
fn parse_probe_output(json_str: &str) -> FFmpegResult<MediaInfo> {
    let json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FFmpegError::ParseError(format!("Failed to parse FFprobe output: {}", e)))?;

    let format = json
        .get("format")
        .ok_or_else(|| FFmpegError::ParseError("Missing format info".to_string()))?;

    let duration_sec = format
        .get("duration")
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .cloned()
        .unwrap_or_default();

    let mut video_info: Option<VideoStreamInfo> = None;
    let mut audio_info: Option<AudioStreamInfo> = None;

    for stream in streams {
        let codec_type = stream.get("codec_type").and_then(|c| c.as_str());

        match codec_type {
            Some("video") if video_info.is_none() => {
                video_info = Some(parse_video_stream(&stream));
            }
            Some("audio") if audio_info.is_none() => {
                audio_info = Some(parse_audio_stream(&stream));
            }
            _ => {}
        }
    }

    Ok(MediaInfo {
        duration_sec,
        video: video_info,
        audio: audio_info,
    })
}

fn parse_video_stream(stream: &serde_json::Value) -> VideoStreamInfo {
    let width = stream.get("width").and_then(|w| w.as_u64()).unwrap_or(0) as u32;
    let height = stream.get("height").and_then(|h| h.as_u64()).unwrap_or(0) as u32;

    // Parse frame rate from r_frame_rate (e.g., "30/1" or "30000/1001")
    let fps = stream
        .get("r_frame_rate")
        .and_then(|f| f.as_str())
        .and_then(|s| {
            let parts: Vec<&str> = s.split('/').collect();
            if parts.len() == 2 {
                let num: f64 = parts[0].parse().ok()?;
                let den: f64 = parts[1].parse().ok()?;
                if den > 0.0 {
                    Some(num / den)
                } else {
                    None
                }
            } else {
                s.parse().ok()
            }
        })
        .unwrap_or(30.0);

    VideoStreamInfo { width, height, fps }
}

fn parse_audio_stream(stream: &serde_json::Value) -> AudioStreamInfo {
    let sample_rate = stream
        .get("sample_rate")
        .and_then(|s| s.as_str())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(44100);

    let channels = stream.get("channels").and_then(|c| c.as_u64()).unwrap_or(2) as u8;

    AudioStreamInfo {
        sample_rate,
        channels,
    }
}

//! Request Surface and Pipeline Configuration
//!
//! [`ClipRequest`] is the immutable, validated input of a pipeline run.
//! [`PipelineConfig`] carries the policy knobs (output geometry, codecs,
//! caption style) with defaults matching the standard short-form profile.

use serde::{Deserialize, Serialize};

use super::captions::models::CaptionStyle;
use super::{CoreError, CoreResult, TimeSec};

/// Minimum clip duration accepted at the request surface (seconds)
pub const MIN_CLIP_DURATION: TimeSec = 15.0;

/// Maximum clip duration accepted at the request surface (seconds)
pub const MAX_CLIP_DURATION: TimeSec = 60.0;

// =============================================================================
// Clip Request
// =============================================================================

/// A validated request for one clip. Immutable once accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    /// Source locator (URL or local path, interpreted by the media fetcher)
    source_locator: String,
    /// Requested start offset into the source, in seconds
    requested_start: TimeSec,
    /// Requested clip length, in seconds
    requested_duration: TimeSec,
}

impl ClipRequest {
    /// Validates and builds a request.
    ///
    /// `requested_duration` must be within `[15, 60]` seconds and
    /// `requested_start` must be non-negative.
    pub fn new(
        source_locator: impl Into<String>,
        requested_start: TimeSec,
        requested_duration: TimeSec,
    ) -> CoreResult<Self> {
        let source_locator = source_locator.into();
        if source_locator.trim().is_empty() {
            return Err(CoreError::InvalidRequest(
                "source locator must not be empty".to_string(),
            ));
        }
        if requested_start < 0.0 || !requested_start.is_finite() {
            return Err(CoreError::NegativeStart(requested_start));
        }
        if !requested_duration.is_finite()
            || requested_duration < MIN_CLIP_DURATION
            || requested_duration > MAX_CLIP_DURATION
        {
            return Err(CoreError::DurationOutOfRange(
                requested_duration,
                MIN_CLIP_DURATION,
                MAX_CLIP_DURATION,
            ));
        }
        Ok(Self {
            source_locator,
            requested_start,
            requested_duration,
        })
    }

    pub fn source_locator(&self) -> &str {
        &self.source_locator
    }

    pub fn requested_start(&self) -> TimeSec {
        self.requested_start
    }

    pub fn requested_duration(&self) -> TimeSec {
        self.requested_duration
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

/// Encoding parameters handed to the codec engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeSettings {
    /// Video codec (e.g., "libx264")
    pub video_codec: String,
    /// Audio codec (e.g., "aac")
    pub audio_codec: String,
    /// Output frame rate
    pub fps: f64,
    /// CRF value for quality-based encoding (lower = better quality)
    pub crf: u8,
    /// Encoder preset (ultrafast .. slow)
    pub preset: String,
    /// Audio bitrate (e.g., "160k")
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            fps: 24.0,
            crf: 23,
            preset: "veryfast".to_string(),
            audio_bitrate: "160k".to_string(),
        }
    }
}

/// Policy knobs for a pipeline run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Output frame height after the 9:16 reframe (width follows the ratio)
    pub output_height: u32,
    /// Encoding parameters for the final export
    pub encode: EncodeSettings,
    /// Styling applied to burned captions
    pub caption_style: CaptionStyle,
    /// Skip captions whose normalized text is empty (silence markers)
    pub skip_empty_captions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_height: 1280,
            encode: EncodeSettings::default(),
            caption_style: CaptionStyle::default(),
            skip_empty_captions: true,
        }
    }
}

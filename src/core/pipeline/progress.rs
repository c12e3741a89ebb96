//! Progress Reporting
//!
//! The pipeline reports a monotonically increasing percentage and a
//! human-readable status string at fixed stage checkpoints. This is advisory
//! telemetry only: a sink must never block and can never fail the run.

use tracing::info;

/// Fixed checkpoint reached when the source download completes
pub const CHECKPOINT_FETCH: u8 = 25;
/// Checkpoint after the window is validated and cut
pub const CHECKPOINT_TRIM: u8 = 35;
/// Fixed checkpoint after the reframe plan is computed
pub const CHECKPOINT_TRANSFORM: u8 = 50;
/// Checkpoint after the audio track is extracted
pub const CHECKPOINT_EXTRACT_AUDIO: u8 = 60;
/// Fixed checkpoint after transcription completes
pub const CHECKPOINT_TRANSCRIBE: u8 = 75;
/// Checkpoint after the subtitle document is composed
pub const CHECKPOINT_COMPOSE: u8 = 85;
/// Fixed checkpoint after the final encode completes
pub const CHECKPOINT_ENCODE: u8 = 100;

/// Observational progress collaborator.
pub trait ProgressSink: Send + Sync {
    /// Reports progress (0-100) with a status string. Must not block.
    fn report(&self, percent: u8, message: &str);
}

/// Sink that logs progress through tracing
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, percent: u8, message: &str) {
        info!(percent, "{}", message);
    }
}

/// Sink that discards all updates
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _percent: u8, _message: &str) {}
}

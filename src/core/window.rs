//! Time Window Validation
//!
//! Clamps and validates the requested (start, duration) against the actual
//! source duration. Pure functions of their inputs; no side effects beyond a
//! tracing warning on clamp.
//!
//! When the naive window would run past the end of the source, the window is
//! shifted backward so its length is preserved (never shrunk). A source that
//! is strictly shorter than the requested duration cannot hold the window at
//! all and is a hard error; producing a silently shorter clip would violate
//! caller expectations.

use thiserror::Error;
use tracing::warn;

use super::{TimeRange, TimeSec};

/// Errors raised during window validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    /// Source duration is below the requested clip length
    #[error("Source too short: {source_duration:.3}s available, {requested_duration:.3}s requested")]
    SourceTooShort {
        source_duration: TimeSec,
        requested_duration: TimeSec,
    },
}

/// The validated [start, end) interval of the source used for the clip
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub effective_start: TimeSec,
    pub effective_end: TimeSec,
}

impl TimeWindow {
    /// Window length in seconds
    pub fn duration(&self) -> TimeSec {
        self.effective_end - self.effective_start
    }

    /// The window as a source-clock time range
    pub fn as_range(&self) -> TimeRange {
        TimeRange::new(self.effective_start, self.effective_end)
    }
}

/// Outcome of a successful validation
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedWindow {
    pub window: TimeWindow,
    /// Set when the requested window was shifted backward to fit the source
    pub clamped: bool,
}

/// Validates the requested window against the source duration.
///
/// Invariants on success: the window length equals `requested_duration`,
/// `effective_start >= 0`, and `effective_end <= source_duration`.
pub fn validate(
    requested_start: TimeSec,
    requested_duration: TimeSec,
    source_duration: TimeSec,
) -> Result<ValidatedWindow, WindowError> {
    if source_duration < requested_duration {
        return Err(WindowError::SourceTooShort {
            source_duration,
            requested_duration,
        });
    }

    let naive_end = requested_start + requested_duration;
    if naive_end > source_duration {
        let effective_start = (source_duration - requested_duration).max(0.0);
        warn!(
            requested_start,
            effective_start, source_duration, "requested window exceeds source, shifting backward"
        );
        return Ok(ValidatedWindow {
            window: TimeWindow {
                effective_start,
                effective_end: effective_start + requested_duration,
            },
            clamped: true,
        });
    }

    Ok(ValidatedWindow {
        window: TimeWindow {
            effective_start: requested_start,
            effective_end: naive_end,
        },
        clamped: false,
    })
}

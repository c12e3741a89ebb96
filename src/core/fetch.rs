//! Media Fetching
//!
//! Defines the fetcher seam the pipeline consumes ([`MediaFetcher`]) and the
//! yt-dlp backend behind it. The fetcher downloads to a caller-chosen
//! destination with a combined audio+video encoding and overwrites an
//! existing destination file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// yt-dlp format selector: combined mp4 video + m4a audio, single-file fallback
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Errors that can occur while fetching the source video
#[derive(Error, Debug)]
pub enum FetchError {
    /// Fetch backend binary could not be spawned
    #[error("Fetcher process error: {0}")]
    ProcessError(#[from] std::io::Error),

    /// Backend ran but reported failure
    #[error("Fetch failed: {0}")]
    DownloadFailed(String),

    /// Backend succeeded but the destination file is missing
    #[error("Fetch produced no file at {0}")]
    MissingOutput(String),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Source media collaborator consumed by the pipeline.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Downloads `locator` to `dest`, overwriting an existing file.
    async fn fetch(&self, locator: &str, dest: &Path) -> FetchResult<()>;
}

/// Fetcher backed by the `yt-dlp` binary.
#[derive(Clone, Debug)]
pub struct YtDlpFetcher {
    binary: PathBuf,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
        }
    }
}

impl YtDlpFetcher {
    /// Uses an explicit yt-dlp binary path instead of PATH lookup
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for one download invocation
    fn build_args(locator: &str, dest: &Path) -> Vec<String> {
        vec![
            "--format".to_string(),
            FORMAT_SELECTOR.to_string(),
            "--force-overwrites".to_string(),
            "--no-playlist".to_string(),
            "--output".to_string(),
            dest.to_string_lossy().to_string(),
            locator.to_string(),
        ]
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, locator: &str, dest: &Path) -> FetchResult<()> {
        info!(locator, dest = %dest.display(), "fetching source video");

        let output = tokio::process::Command::new(&self.binary)
            .args(Self::build_args(locator, dest))
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::DownloadFailed(stderr.trim().to_string()));
        }

        if !dest.exists() {
            return Err(FetchError::MissingOutput(
                dest.to_string_lossy().to_string(),
            ));
        }

        Ok(())
    }
}

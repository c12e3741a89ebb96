//! Stage Pipeline Controller
//!
//! Executes one clip request end-to-end: every stage consumes the previous
//! stage's artifact, all intermediate artifacts live in a per-run temp
//! directory, and teardown runs on every exit path. The run is strictly
//! sequential; concurrency exists only across independent runs.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::captions::whisper::SpeechTranscriber;
use crate::core::captions::{map_segments, render_ass};
use crate::core::config::{ClipRequest, PipelineConfig};
use crate::core::fetch::MediaFetcher;
use crate::core::ffmpeg::{EncodeProgress, MediaEngine};
use crate::core::geometry::FramePlan;
use crate::core::window::{self, TimeWindow};
use crate::core::Size2D;

use super::progress::{
    ProgressSink, CHECKPOINT_COMPOSE, CHECKPOINT_ENCODE, CHECKPOINT_EXTRACT_AUDIO,
    CHECKPOINT_FETCH, CHECKPOINT_TRANSCRIBE, CHECKPOINT_TRANSFORM, CHECKPOINT_TRIM,
};
use super::{
    CancelHandle, ClipOutcome, PipelineError, PipelineWarning, SourceVideo, Stage, StageError,
};

/// The clip generation pipeline.
///
/// Holds the collaborators shared across runs; each [`run`](Self::run) call is
/// an independent pipeline run with its own temporary resources. The one
/// shared serialization point is the transcriber, which owns its own
/// admission gate.
pub struct ClipPipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn MediaFetcher>,
    engine: Arc<dyn MediaEngine>,
    transcriber: Arc<dyn SpeechTranscriber>,
    progress: Arc<dyn ProgressSink>,
}

impl ClipPipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn MediaFetcher>,
        engine: Arc<dyn MediaEngine>,
        transcriber: Arc<dyn SpeechTranscriber>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            config,
            fetcher,
            engine,
            transcriber,
            progress,
        }
    }

    /// Runs the pipeline for one request, writing the final clip to
    /// `output_path`. A cancelled or failed run produces no output and leaves
    /// no temporary files behind.
    pub async fn run(
        &self,
        request: &ClipRequest,
        output_path: &Path,
        cancel: Option<CancelHandle>,
    ) -> Result<ClipOutcome, PipelineError> {
        let run_id = ulid::Ulid::new().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let cancel = cancel.unwrap_or_default();

        let temp = tempfile::Builder::new()
            .prefix("clipforge-")
            .tempdir()
            .map_err(|e| PipelineError::new(Stage::Fetch, StageError::Io(e)))?;

        info!(
            run_id,
            locator = request.source_locator(),
            "pipeline run started"
        );

        let result = self
            .execute(request, temp.path(), output_path, &cancel, run_id.clone(), created_at)
            .await;

        // Guaranteed release on every exit path. A cleanup failure is logged
        // but never escalated over the primary result.
        if let Err(e) = temp.close() {
            warn!(run_id, error = %e, "temp resource cleanup failed");
        }

        match &result {
            Ok(outcome) => info!(run_id, output = %outcome.output_path.display(), "pipeline run complete"),
            Err(e) => warn!(run_id, stage = %e.stage, "pipeline run failed: {}", e.cause),
        }

        result
    }

    async fn execute(
        &self,
        request: &ClipRequest,
        work_dir: &Path,
        output_path: &Path,
        cancel: &CancelHandle,
        run_id: String,
        created_at: String,
    ) -> Result<ClipOutcome, PipelineError> {
        let mut warnings = Vec::new();

        // ---- Fetch --------------------------------------------------------
        checkpoint(cancel, Stage::Fetch)?;
        let source_path = work_dir.join("source.mp4");
        self.fetcher
            .fetch(request.source_locator(), &source_path)
            .await
            .map_err(|e| PipelineError::new(Stage::Fetch, e))?;
        self.progress
            .report(CHECKPOINT_FETCH, "Source video downloaded");

        // ---- Trim ---------------------------------------------------------
        checkpoint(cancel, Stage::Trim)?;
        let source = self.probe_source(&source_path).await?;
        let validated = window::validate(
            request.requested_start(),
            request.requested_duration(),
            source.duration_sec,
        )
        .map_err(|e| PipelineError::new(Stage::Trim, e))?;
        if validated.clamped {
            warnings.push(PipelineWarning::WindowClamped {
                requested_start: request.requested_start(),
                effective_start: validated.window.effective_start,
            });
        }
        let window = validated.window;

        let trimmed_path = work_dir.join("trimmed.mp4");
        self.engine
            .trim(&source.file_path, &window, &trimmed_path)
            .await
            .map_err(|e| PipelineError::new(Stage::Trim, e))?;
        self.progress.report(CHECKPOINT_TRIM, "Clip trimmed");

        // ---- Transform ----------------------------------------------------
        checkpoint(cancel, Stage::Transform)?;
        let plan = FramePlan::plan(source.frame_size, self.config.output_height)
            .map_err(|e| PipelineError::new(Stage::Transform, e))?;
        self.progress
            .report(CHECKPOINT_TRANSFORM, "Vertical reframe planned");

        // ---- Extract audio ------------------------------------------------
        checkpoint(cancel, Stage::ExtractAudio)?;
        let audio_path = work_dir.join("audio.wav");
        self.engine
            .extract_audio(&trimmed_path, &audio_path)
            .await
            .map_err(|e| PipelineError::new(Stage::ExtractAudio, e))?;
        self.progress
            .report(CHECKPOINT_EXTRACT_AUDIO, "Audio track extracted");

        // ---- Transcribe ---------------------------------------------------
        checkpoint(cancel, Stage::Transcribe)?;
        let segments = self
            .transcriber
            .transcribe(&audio_path)
            .await
            .map_err(|e| PipelineError::new(Stage::Transcribe, e))?;
        self.progress
            .report(CHECKPOINT_TRANSCRIBE, "Speech transcribed");

        // ---- Compose captions ---------------------------------------------
        checkpoint(cancel, Stage::ComposeCaptions)?;
        let mut captions = map_segments(&segments);
        if self.config.skip_empty_captions {
            let before = captions.len();
            captions.retain(|c| !c.is_empty());
            let skipped = before - captions.len();
            if skipped > 0 {
                info!(run_id, skipped, "skipped empty caption segments");
            }
        }
        let subtitle_path = if captions.is_empty() {
            None
        } else {
            let path = work_dir.join("captions.ass");
            let document = render_ass(&captions, &self.config.caption_style, plan.output_size());
            tokio::fs::write(&path, document)
                .await
                .map_err(|e| PipelineError::new(Stage::ComposeCaptions, StageError::Io(e)))?;
            Some(path)
        };
        self.progress
            .report(CHECKPOINT_COMPOSE, "Captions composed");

        // ---- Encode -------------------------------------------------------
        checkpoint(cancel, Stage::Encode)?;
        let staged_path = work_dir.join("final_clip.mp4");
        let (tx, rx) = mpsc::channel::<EncodeProgress>(32);
        let forwarder = spawn_encode_forwarder(rx, Arc::clone(&self.progress), window.duration());

        self.engine
            .render(
                &trimmed_path,
                &plan,
                subtitle_path.as_deref(),
                &self.config.encode,
                &staged_path,
                Some(tx),
            )
            .await
            .map_err(|e| PipelineError::new(Stage::Encode, e))?;
        let _ = forwarder.await;

        move_into_place(&staged_path, output_path)
            .await
            .map_err(|e| PipelineError::new(Stage::Encode, StageError::Io(e)))?;
        self.progress.report(CHECKPOINT_ENCODE, "Clip ready");

        Ok(ClipOutcome {
            run_id,
            output_path: output_path.to_path_buf(),
            window,
            captions_burned: captions.len(),
            warnings,
            created_at,
        })
    }

    /// Probes the fetched source and requires a video stream.
    async fn probe_source(&self, source_path: &Path) -> Result<SourceVideo, PipelineError> {
        let info = self
            .engine
            .probe(source_path)
            .await
            .map_err(|e| PipelineError::new(Stage::Trim, e))?;

        let video = info
            .video
            .as_ref()
            .ok_or_else(|| PipelineError::new(Stage::Trim, StageError::MissingVideoStream))?;

        Ok(SourceVideo {
            file_path: source_path.to_path_buf(),
            duration_sec: info.duration_sec,
            frame_size: Size2D::new(video.width, video.height),
        })
    }
}

/// Cooperative cancellation checkpoint at a stage boundary
fn checkpoint(cancel: &CancelHandle, stage: Stage) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        return Err(PipelineError::new(stage, StageError::Cancelled));
    }
    Ok(())
}

/// Forwards encoder progress into the sink, scaled into the band between the
/// compose and encode checkpoints so the reported series stays monotone.
fn spawn_encode_forwarder(
    mut rx: mpsc::Receiver<EncodeProgress>,
    sink: Arc<dyn ProgressSink>,
    clip_duration: f64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let band = (CHECKPOINT_ENCODE - CHECKPOINT_COMPOSE) as f64;
        while let Some(update) = rx.recv().await {
            let fraction = if clip_duration > 0.0 {
                (update.time_sec / clip_duration).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let percent = (CHECKPOINT_COMPOSE as f64 + fraction * band).floor() as u8;
            sink.report(
                percent.min(CHECKPOINT_ENCODE - 1),
                &format!(
                    "Encoding: {:.1}s of {:.1}s",
                    update.time_sec, clip_duration
                ),
            );
        }
    })
}

/// Moves the staged clip to its final destination, falling back to copy for
/// cross-device targets.
async fn move_into_place(staged: &Path, output: &Path) -> std::io::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if tokio::fs::rename(staged, output).await.is_ok() {
        return Ok(());
    }
    copy_into_place(staged, output).await
}

/// Cross-device fallback for [`move_into_place`].
///
/// After a failed copy the destination content is undefined (the target is
/// opened with truncation), so the file is removed rather than left
/// half-written at the caller's path.
async fn copy_into_place(staged: &Path, output: &Path) -> std::io::Result<()> {
    if let Err(e) = tokio::fs::copy(staged, output).await {
        let _ = tokio::fs::remove_file(output).await;
        return Err(e);
    }
    let _ = tokio::fs::remove_file(staged).await;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::captions::whisper::{TranscribeError, TranscribeResult, TranscriptSegment};
    use crate::core::fetch::FetchResult;
    use crate::core::ffmpeg::{FFmpegError, FFmpegResult, MediaInfo, VideoStreamInfo};
    use crate::core::config::EncodeSettings;

    // ---- Mock collaborators ------------------------------------------------

    #[derive(Default)]
    struct MockFetcher {
        destinations: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    #[async_trait]
    impl MediaFetcher for MockFetcher {
        async fn fetch(&self, _locator: &str, dest: &Path) -> FetchResult<()> {
            if self.fail {
                return Err(crate::core::fetch::FetchError::DownloadFailed(
                    "unreachable".to_string(),
                ));
            }
            std::fs::write(dest, b"source").unwrap();
            self.destinations.lock().unwrap().push(dest.to_path_buf());
            Ok(())
        }
    }

    struct MockEngine {
        duration_sec: f64,
        width: u32,
        height: u32,
        fail_render: bool,
    }

    impl MockEngine {
        fn landscape(duration_sec: f64) -> Self {
            Self {
                duration_sec,
                width: 1920,
                height: 1080,
                fail_render: false,
            }
        }
    }

    #[async_trait]
    impl MediaEngine for MockEngine {
        async fn probe(&self, _input: &Path) -> FFmpegResult<MediaInfo> {
            Ok(MediaInfo {
                duration_sec: self.duration_sec,
                video: Some(VideoStreamInfo {
                    width: self.width,
                    height: self.height,
                    fps: 30.0,
                }),
                audio: None,
            })
        }

        async fn trim(
            &self,
            _input: &Path,
            _window: &TimeWindow,
            output: &Path,
        ) -> FFmpegResult<()> {
            std::fs::write(output, b"trimmed").unwrap();
            Ok(())
        }

        async fn extract_audio(&self, _input: &Path, output: &Path) -> FFmpegResult<()> {
            std::fs::write(output, b"audio").unwrap();
            Ok(())
        }

        async fn render(
            &self,
            _input: &Path,
            _plan: &FramePlan,
            _subtitles: Option<&Path>,
            _settings: &EncodeSettings,
            output: &Path,
            _progress: Option<mpsc::Sender<EncodeProgress>>,
        ) -> FFmpegResult<()> {
            if self.fail_render {
                return Err(FFmpegError::ExecutionFailed("encoder crashed".to_string()));
            }
            std::fs::write(output, b"clip").unwrap();
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockTranscriber {
        segments: Vec<TranscriptSegment>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechTranscriber for MockTranscriber {
        async fn transcribe(&self, _audio: &Path) -> TranscribeResult<Vec<TranscriptSegment>> {
            if self.fail {
                return Err(TranscribeError::InferenceError("model exploded".to_string()));
            }
            Ok(self.segments.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<(u8, String)>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, percent: u8, message: &str) {
            self.updates
                .lock()
                .unwrap()
                .push((percent, message.to_string()));
        }
    }

    // ---- Helpers -----------------------------------------------------------

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment {
                text: "hello".to_string(),
                start_sec: 0.0,
                end_sec: 1.2,
            },
            TranscriptSegment {
                text: "world".to_string(),
                start_sec: 1.2,
                end_sec: 2.5,
            },
        ]
    }

    struct Harness {
        pipeline: ClipPipeline,
        fetcher: Arc<MockFetcher>,
        sink: Arc<RecordingSink>,
        out_dir: tempfile::TempDir,
    }

    impl Harness {
        fn output(&self) -> PathBuf {
            self.out_dir.path().join("clip.mp4")
        }

        fn fetched_dir(&self) -> PathBuf {
            let destinations = self.fetcher.destinations.lock().unwrap();
            destinations[0].parent().unwrap().to_path_buf()
        }

        fn percents(&self) -> Vec<u8> {
            self.sink.updates.lock().unwrap().iter().map(|u| u.0).collect()
        }
    }

    fn harness(
        engine: MockEngine,
        transcriber: MockTranscriber,
        fetch_fail: bool,
    ) -> Harness {
        let fetcher = Arc::new(MockFetcher {
            fail: fetch_fail,
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let pipeline = ClipPipeline::new(
            PipelineConfig::default(),
            fetcher.clone(),
            Arc::new(engine),
            Arc::new(transcriber),
            sink.clone(),
        );
        Harness {
            pipeline,
            fetcher,
            sink,
            out_dir: tempfile::tempdir().unwrap(),
        }
    }

    fn request(start: f64, duration: f64) -> ClipRequest {
        ClipRequest::new("https://example.com/v", start, duration).unwrap()
    }

    // ---- Tests -------------------------------------------------------------

    #[tokio::test]
    async fn successful_run_produces_clip_and_cleans_up() {
        let h = harness(
            MockEngine::landscape(120.0),
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );

        let outcome = h
            .pipeline
            .run(&request(10.0, 30.0), &h.output(), None)
            .await
            .unwrap();

        assert!(h.output().exists());
        assert_eq!(outcome.window.effective_start, 10.0);
        assert_eq!(outcome.window.effective_end, 40.0);
        assert_eq!(outcome.captions_burned, 2);
        assert!(outcome.warnings.is_empty());
        assert!(!outcome.run_id.is_empty());

        // Temp resources are gone once control returns
        assert!(!h.fetched_dir().exists());

        // Fixed checkpoints present and series monotone
        let percents = h.percents();
        for checkpoint in [25u8, 50, 75, 100] {
            assert!(percents.contains(&checkpoint), "missing {}", checkpoint);
        }
        assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn clamped_window_is_reported_as_warning() {
        let h = harness(
            MockEngine::landscape(100.0),
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );

        let outcome = h
            .pipeline
            .run(&request(90.0, 30.0), &h.output(), None)
            .await
            .unwrap();

        assert_eq!(outcome.window.effective_start, 70.0);
        assert_eq!(outcome.window.effective_end, 100.0);
        assert_eq!(
            outcome.warnings,
            vec![PipelineWarning::WindowClamped {
                requested_start: 90.0,
                effective_start: 70.0,
            }]
        );
    }

    #[tokio::test]
    async fn source_equal_to_duration_is_clamped_not_fatal() {
        let h = harness(
            MockEngine::landscape(30.0),
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );

        let outcome = h
            .pipeline
            .run(&request(5.0, 30.0), &h.output(), None)
            .await
            .unwrap();

        assert_eq!(outcome.window.effective_start, 0.0);
        assert_eq!(outcome.window.effective_end, 30.0);
    }

    #[tokio::test]
    async fn short_source_aborts_with_no_partial_clip() {
        let h = harness(MockEngine::landscape(20.0), MockTranscriber::default(), false);

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Trim);
        assert!(matches!(
            err.cause,
            StageError::Window(window::WindowError::SourceTooShort { .. })
        ));
        assert!(!h.output().exists());
        assert!(!h.fetched_dir().exists());
    }

    #[tokio::test]
    async fn narrow_source_fails_transform_stage() {
        let engine = MockEngine {
            duration_sec: 120.0,
            width: 500,
            height: 1000,
            fail_render: false,
        };
        let h = harness(engine, MockTranscriber::default(), false);

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Transform);
        assert!(matches!(err.cause, StageError::Geometry(_)));
    }

    #[tokio::test]
    async fn fetch_failure_is_stage_tagged() {
        let h = harness(MockEngine::landscape(120.0), MockTranscriber::default(), true);

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Fetch);
        assert!(matches!(err.cause, StageError::Fetch(_)));
        assert!(!h.output().exists());
    }

    #[tokio::test]
    async fn transcription_failure_leaves_no_temp_files() {
        let h = harness(
            MockEngine::landscape(120.0),
            MockTranscriber {
                fail: true,
                ..Default::default()
            },
            false,
        );

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Transcribe);
        assert!(matches!(err.cause, StageError::Transcription(_)));
        assert!(!h.output().exists());
        assert!(!h.fetched_dir().exists());
    }

    #[tokio::test]
    async fn encode_failure_is_stage_tagged() {
        let engine = MockEngine {
            fail_render: true,
            ..MockEngine::landscape(120.0)
        };
        let h = harness(
            engine,
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Encode);
        assert!(matches!(err.cause, StageError::Engine(_)));
        assert!(!h.output().exists());
    }

    #[tokio::test]
    async fn failed_copy_fallback_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        // Stale content at the destination stands in for a half-written copy;
        // both are undefined after a failed transfer and must not survive.
        std::fs::write(&output, b"stale").unwrap();

        let err = copy_into_place(&dir.path().join("missing.mp4"), &output)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn cancelled_run_stops_before_first_stage() {
        let h = harness(MockEngine::landscape(120.0), MockTranscriber::default(), false);
        let cancel = CancelHandle::new();
        cancel.cancel();

        let err = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), Some(cancel))
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Fetch);
        assert!(matches!(err.cause, StageError::Cancelled));
        assert!(!h.output().exists());
        assert!(h.sink.updates.lock().unwrap().is_empty());
    }

    /// Sink that cancels the run once a given checkpoint is reported
    struct CancelAtSink {
        handle: CancelHandle,
        trigger: u8,
    }

    impl ProgressSink for CancelAtSink {
        fn report(&self, percent: u8, _message: &str) {
            if percent == self.trigger {
                self.handle.cancel();
            }
        }
    }

    #[tokio::test]
    async fn cancellation_at_interior_boundary_cleans_up() {
        let fetcher = Arc::new(MockFetcher::default());
        let cancel = CancelHandle::new();
        let pipeline = ClipPipeline::new(
            PipelineConfig::default(),
            fetcher.clone(),
            Arc::new(MockEngine::landscape(120.0)),
            Arc::new(MockTranscriber {
                segments: segments(),
                ..Default::default()
            }),
            Arc::new(CancelAtSink {
                handle: cancel.clone(),
                trigger: CHECKPOINT_EXTRACT_AUDIO,
            }),
        );
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("clip.mp4");

        let err = pipeline
            .run(&request(0.0, 30.0), &output, Some(cancel))
            .await
            .unwrap_err();

        // Cancellation lands at the next stage boundary, not mid-stage
        assert_eq!(err.stage, Stage::Transcribe);
        assert!(matches!(err.cause, StageError::Cancelled));
        assert!(!output.exists());
        let fetched_dir = {
            let destinations = fetcher.destinations.lock().unwrap();
            destinations[0].parent().unwrap().to_path_buf()
        };
        assert!(!fetched_dir.exists());
    }

    #[tokio::test]
    async fn empty_captions_are_skipped_at_composition() {
        let segments = vec![
            TranscriptSegment {
                text: "   ".to_string(),
                start_sec: 0.0,
                end_sec: 0.5,
            },
            TranscriptSegment {
                text: "spoken".to_string(),
                start_sec: 0.5,
                end_sec: 2.0,
            },
        ];
        let h = harness(
            MockEngine::landscape(120.0),
            MockTranscriber {
                segments,
                ..Default::default()
            },
            false,
        );

        let outcome = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap();

        assert_eq!(outcome.captions_burned, 1);
    }

    #[tokio::test]
    async fn silent_clip_encodes_without_subtitle_file() {
        let h = harness(MockEngine::landscape(120.0), MockTranscriber::default(), false);

        let outcome = h
            .pipeline
            .run(&request(0.0, 30.0), &h.output(), None)
            .await
            .unwrap();

        assert_eq!(outcome.captions_burned, 0);
        assert!(h.output().exists());
    }

    #[tokio::test]
    async fn concurrent_runs_are_isolated() {
        let a = harness(
            MockEngine::landscape(120.0),
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );
        let b = harness(
            MockEngine::landscape(200.0),
            MockTranscriber {
                segments: segments(),
                ..Default::default()
            },
            false,
        );

        let (req_a, out_a) = (request(0.0, 30.0), a.output());
        let (req_b, out_b) = (request(50.0, 30.0), b.output());
        let (ra, rb) = tokio::join!(
            a.pipeline.run(&req_a, &out_a, None),
            b.pipeline.run(&req_b, &out_b, None),
        );
        ra.unwrap();
        rb.unwrap();

        // Each run used its own temp resources and progress sink
        assert_ne!(a.fetched_dir(), b.fetched_dir());
        assert!(!a.fetched_dir().exists());
        assert!(!b.fetched_dir().exists());
        assert_eq!(a.percents().last(), Some(&100));
        assert_eq!(b.percents().last(), Some(&100));
    }
}

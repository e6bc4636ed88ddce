//! Orchestrator lifecycle integration tests.
//!
//! These tests verify the complete job lifecycle through the orchestrator:
//! pending -> scene_planning -> asset_retrieval -> audio_processing ->
//! rendering -> completed, plus the failure and cancellation paths.

use std::sync::Arc;
use std::time::Duration;

use storyreel_core::assets::AssetError;
use storyreel_core::notify::WebhookConfig;
use storyreel_core::orchestrator::{storyboard_key, PROGRESS_PLANNED};
use storyreel_core::testing::{
    fixtures, MockAssetRetriever, MockRenderer, MockSynthesizer, RecordingNotifier,
};
use storyreel_core::{
    EventNotifier, JobRegistry, JobStatus, OrchestratorConfig, OrchestratorError,
    PipelineOrchestrator, Storyboard, TtlCache, VideoResult, WebhookClient,
};

type TestOrchestrator = PipelineOrchestrator<MockAssetRetriever, MockSynthesizer, MockRenderer>;

/// Test helper wiring mock collaborators to an orchestrator.
struct TestHarness {
    registry: Arc<JobRegistry>,
    storyboards: Arc<TtlCache<Storyboard>>,
    assets: Arc<MockAssetRetriever>,
    speech: Arc<MockSynthesizer>,
    renderer: Arc<MockRenderer>,
    notifier: Arc<RecordingNotifier>,
    orchestrator: TestOrchestrator,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(OrchestratorConfig::default(), WebhookClient::disabled())
    }

    fn with_config(config: OrchestratorConfig, webhook: WebhookClient) -> Self {
        // RUST_LOG=debug makes failing runs readable
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let registry = Arc::new(JobRegistry::new());
        let storyboards = Arc::new(TtlCache::new(Duration::from_secs(3600)));
        let results = Arc::new(TtlCache::<VideoResult>::new(Duration::from_secs(3600)));
        let assets = Arc::new(MockAssetRetriever::new());
        let speech = Arc::new(MockSynthesizer::new());
        let renderer = Arc::new(MockRenderer::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let orchestrator = PipelineOrchestrator::new(
            config,
            Arc::clone(&registry),
            Arc::clone(&storyboards),
            Arc::clone(&results),
            Arc::clone(&assets),
            Arc::clone(&speech),
            Arc::clone(&renderer),
            Arc::clone(&notifier) as Arc<dyn EventNotifier>,
            webhook,
        );

        Self {
            registry,
            storyboards,
            assets,
            speech,
            renderer,
            notifier,
            orchestrator,
        }
    }

    /// Poll until the job reaches `expected`, giving up on timeout or on a
    /// different terminal status.
    async fn wait_for_status(&self, job_id: &str, expected: JobStatus, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            if let Some(progress) = self.registry.snapshot(job_id).await {
                if progress.status == expected {
                    return true;
                }
                if progress.status.is_terminal() {
                    return false;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    /// Poll until the job reaches any terminal status.
    async fn wait_for_terminal(&self, job_id: &str, timeout: Duration) -> Option<JobStatus> {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            if let Some(progress) = self.registry.snapshot(job_id).await {
                if progress.status.is_terminal() {
                    return Some(progress.status);
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        None
    }

    /// Poll until a completion event has been published.
    async fn wait_for_completion_event(&self, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            if self.notifier.has_completed().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_full_pipeline_completes() {
    let harness = TestHarness::new();
    harness
        .assets
        .set_clips(vec![fixtures::clip("c1", 6.0), fixtures::clip("c2", 12.0)])
        .await;

    let request = fixtures::request("A calm lake at dawn. Mist rises slowly.", 10);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Completed)
    );
    assert!(harness.wait_for_completion_event(WAIT).await);

    let progress = harness.registry.snapshot(&job_id).await.unwrap();
    assert_eq!(progress.overall_progress, 100.0);
    assert_eq!(progress.total_scenes, 2);
    assert_eq!(progress.scenes_processed, 2);
    assert!(progress.error.is_none());
    assert!(!progress.logs.is_empty());

    // the storyboard was enriched in place
    let storyboard = harness.orchestrator.storyboard(&job_id).await.unwrap();
    assert_eq!(storyboard.scenes.len(), 2);
    assert!(storyboard.scenes.iter().all(|s| s.clip.is_some()));
    assert_eq!(storyboard.audio_segments.len(), 1);
    assert!(!storyboard.subtitles.is_empty());

    // the result descriptor is cached under result:<jobId>
    let result = harness.orchestrator.result(&job_id).await.unwrap();
    assert_eq!(
        result.video_url,
        format!("s3://videos/{}/output.mp4", job_id)
    );
    assert_eq!(result.format, "mp4");

    // progress milestones in order
    let updates = harness.notifier.status_updates().await;
    let milestones: Vec<(JobStatus, f32)> = vec![
        (JobStatus::Pending, 0.0),
        (JobStatus::ScenePlanning, 20.0),
        (JobStatus::AssetRetrieval, 40.0),
        (JobStatus::AudioProcessing, 60.0),
        (JobStatus::Completed, 100.0),
    ];
    assert_eq!(updates, milestones);
}

#[tokio::test]
async fn test_asset_failure_fails_job_and_keeps_storyboard() {
    let harness = TestHarness::new();
    harness
        .assets
        .set_next_error(AssetError::Transport("connection reset by peer".to_string()))
        .await;

    let request = fixtures::request("A city street. Neon signs flicker.", 20);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Failed)
    );

    let progress = harness.registry.snapshot(&job_id).await.unwrap();
    let error = progress.error.expect("error should be recorded");
    assert!(error.contains("connection reset by peer"));
    // progress froze at the last committed milestone
    assert_eq!(progress.overall_progress, PROGRESS_PLANNED);

    // the storyboard written during planning stays cached for diagnostics
    assert!(harness
        .storyboards
        .get(&storyboard_key(&job_id))
        .await
        .is_some());
    // no result was produced, later collaborators never ran
    assert!(harness.orchestrator.result(&job_id).await.is_none());
    assert_eq!(harness.speech.call_count().await, 0);
    assert_eq!(harness.renderer.call_count().await, 0);

    assert!(harness.notifier.first_failure().await.is_some());
}

#[tokio::test]
async fn test_cancellation_between_stages_stops_pipeline() {
    let harness = TestHarness::new();
    // slow asset retrieval opens a window to cancel mid-stage
    harness.assets.set_delay(Duration::from_millis(100)).await;
    harness.assets.set_clips(vec![fixtures::clip("c", 5.0)]).await;

    let request = fixtures::request("A calm lake at dawn. Mist rises slowly.", 10);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert!(
        harness
            .wait_for_status(&job_id, JobStatus::AssetRetrieval, WAIT)
            .await
    );
    harness.orchestrator.cancel(&job_id).await.unwrap();

    // let the in-flight stage drain and the pre-stage check observe the
    // cancellation
    tokio::time::sleep(Duration::from_millis(500)).await;

    let progress = harness.registry.snapshot(&job_id).await.unwrap();
    assert_eq!(progress.status, JobStatus::Cancelled);
    // narration synthesis was never invoked
    assert_eq!(harness.speech.call_count().await, 0);
    assert_eq!(harness.renderer.call_count().await, 0);
    // progress froze at the value committed before cancellation
    assert_eq!(progress.overall_progress, PROGRESS_PLANNED);
    assert!(!harness.notifier.has_completed().await);
}

#[tokio::test]
async fn test_cancel_completed_job_is_rejected() {
    let harness = TestHarness::new();
    let request = fixtures::request("A short clip.", 10);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Completed)
    );

    let err = harness.orchestrator.cancel(&job_id).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Registry(_)));
}

#[tokio::test]
async fn test_render_deadline_exceeded_fails_job() {
    let config = OrchestratorConfig {
        render_deadline_secs: 0,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, WebhookClient::disabled());
    harness.renderer.set_delay(Duration::from_secs(30)).await;

    let request = fixtures::request("A mountain trail. Pine forests.", 10);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Failed)
    );

    let progress = harness.registry.snapshot(&job_id).await.unwrap();
    assert!(progress.error.unwrap().contains("deadline"));
    assert!(harness.orchestrator.result(&job_id).await.is_none());
}

#[tokio::test]
async fn test_job_failures_are_isolated() {
    // serialize jobs so the injected error deterministically hits the first
    let config = OrchestratorConfig {
        max_concurrent_jobs: 1,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, WebhookClient::disabled());

    harness
        .assets
        .set_next_error(AssetError::Transport("indexer down".to_string()))
        .await;
    let failing = harness
        .orchestrator
        .submit(fixtures::request("First job. Doomed to fail.", 10))
        .await
        .unwrap();
    assert_eq!(
        harness.wait_for_terminal(&failing, WAIT).await,
        Some(JobStatus::Failed)
    );

    let healthy = harness
        .orchestrator
        .submit(fixtures::request("Second job. Runs fine.", 10))
        .await
        .unwrap();
    assert_eq!(
        harness.wait_for_terminal(&healthy, WAIT).await,
        Some(JobStatus::Completed)
    );

    let summary = harness.registry.summary().await;
    assert_eq!(summary.total_jobs, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.completed, 1);
}

#[tokio::test]
async fn test_explicit_scene_count_flows_through_pipeline() {
    let harness = TestHarness::new();
    harness.assets.set_clips(vec![fixtures::clip("c", 5.0)]).await;

    let request =
        fixtures::request("One. Two. Three. Four. Five. Six. Seven. Eight.", 40).with_scene_count(4);
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Completed)
    );

    let progress = harness.registry.snapshot(&job_id).await.unwrap();
    assert_eq!(progress.total_scenes, 4);
    assert_eq!(progress.scenes_processed, 4);

    let storyboard = harness.orchestrator.storyboard(&job_id).await.unwrap();
    assert_eq!(storyboard.scenes.len(), 4);
}

#[tokio::test]
async fn test_duplicate_submission_rejected() {
    let harness = TestHarness::new();
    let request = fixtures::request("A prompt.", 10);

    harness.orchestrator.submit(request.clone()).await.unwrap();
    let err = harness.orchestrator.submit(request).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Registry(_)));
}

#[tokio::test]
async fn test_webhook_failure_does_not_affect_job_outcome() {
    let webhook = WebhookClient::new(&WebhookConfig {
        enabled: true,
        timeout_secs: 1,
    });
    let harness = TestHarness::with_config(OrchestratorConfig::default(), webhook);

    // nothing listens on this port; delivery fails, the job must not care
    let request =
        fixtures::request("A prompt. Another sentence.", 10).with_callback_url("http://127.0.0.1:1/hook");
    let job_id = harness.orchestrator.submit(request).await.unwrap();

    assert_eq!(
        harness.wait_for_terminal(&job_id, Duration::from_secs(10)).await,
        Some(JobStatus::Completed)
    );
    assert!(harness.orchestrator.result(&job_id).await.is_some());
}

#[tokio::test]
async fn test_status_reports_active_slots() {
    let config = OrchestratorConfig {
        max_concurrent_jobs: 2,
        ..Default::default()
    };
    let harness = TestHarness::with_config(config, WebhookClient::disabled());
    harness.assets.set_delay(Duration::from_millis(200)).await;

    let status = harness.orchestrator.status();
    assert_eq!(status.active_jobs, 0);
    assert_eq!(status.max_concurrent_jobs, 2);

    let job_id = harness
        .orchestrator
        .submit(fixtures::request("Slow job. Takes a while.", 10))
        .await
        .unwrap();
    assert!(
        harness
            .wait_for_status(&job_id, JobStatus::AssetRetrieval, WAIT)
            .await
    );
    assert_eq!(harness.orchestrator.status().active_jobs, 1);

    assert_eq!(
        harness.wait_for_terminal(&job_id, WAIT).await,
        Some(JobStatus::Completed)
    );
}

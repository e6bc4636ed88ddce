//! Pipeline orchestrator implementation.
//!
//! Each submitted job runs as one independent task that owns the job's
//! progress record exclusively. The task walks the stage sequence (plan,
//! retrieve assets, synthesize audio, render), persists intermediate
//! artifacts to the shared cache, and publishes progress through the event
//! notifier after each stage. Cancellation is cooperative: it is checked
//! before each stage, never mid-stage.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::assets::AssetRetrieval;
use crate::cache::TtlCache;
use crate::job::{
    JobRegistry, JobStatus, ProgressHandle, Storyboard, VideoRequest, VideoResult,
};
use crate::metrics;
use crate::notify::{EventNotifier, WebhookClient};
use crate::planner::ScenePlanner;
use crate::render::{RenderTarget, Renderer};
use crate::speech::SpeechSynthesizer;

use super::config::OrchestratorConfig;
use super::types::{JobOutcome, OrchestratorError, OrchestratorStatus};

/// Progress committed after scene planning.
pub const PROGRESS_PLANNED: f32 = 20.0;
/// Progress committed after asset retrieval.
pub const PROGRESS_ASSETS: f32 = 40.0;
/// Progress committed after audio processing.
pub const PROGRESS_AUDIO: f32 = 60.0;
/// Progress committed after rendering.
pub const PROGRESS_RENDERED: f32 = 100.0;

/// Cache key for a job's storyboard.
pub fn storyboard_key(job_id: &str) -> String {
    format!("storyboard:{}", job_id)
}

/// Cache key for a job's result descriptor.
pub fn result_key(job_id: &str) -> String {
    format!("result:{}", job_id)
}

/// Everything a per-job task needs, cloned out of the orchestrator at
/// submission time.
struct StageContext<A, S, R> {
    config: OrchestratorConfig,
    storyboards: Arc<TtlCache<Storyboard>>,
    results: Arc<TtlCache<VideoResult>>,
    assets: Arc<A>,
    speech: Arc<S>,
    renderer: Arc<R>,
    notifier: Arc<dyn EventNotifier>,
    webhook: WebhookClient,
    planner: ScenePlanner,
}

/// The pipeline orchestrator: drives jobs through the status state machine.
pub struct PipelineOrchestrator<A, S, R> {
    config: OrchestratorConfig,
    registry: Arc<JobRegistry>,
    storyboards: Arc<TtlCache<Storyboard>>,
    results: Arc<TtlCache<VideoResult>>,
    assets: Arc<A>,
    speech: Arc<S>,
    renderer: Arc<R>,
    notifier: Arc<dyn EventNotifier>,
    webhook: WebhookClient,
    job_slots: Arc<Semaphore>,
}

impl<A, S, R> PipelineOrchestrator<A, S, R>
where
    A: AssetRetrieval + 'static,
    S: SpeechSynthesizer + 'static,
    R: Renderer + 'static,
{
    /// Create a new orchestrator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: OrchestratorConfig,
        registry: Arc<JobRegistry>,
        storyboards: Arc<TtlCache<Storyboard>>,
        results: Arc<TtlCache<VideoResult>>,
        assets: Arc<A>,
        speech: Arc<S>,
        renderer: Arc<R>,
        notifier: Arc<dyn EventNotifier>,
        webhook: WebhookClient,
    ) -> Self {
        let job_slots = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        Self {
            config,
            registry,
            storyboards,
            results,
            assets,
            speech,
            renderer,
            notifier,
            webhook,
            job_slots,
        }
    }

    /// The job registry backing this orchestrator.
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Current orchestrator status.
    pub fn status(&self) -> OrchestratorStatus {
        let max = self.config.max_concurrent_jobs;
        OrchestratorStatus {
            active_jobs: max - self.job_slots.available_permits().min(max),
            max_concurrent_jobs: max,
        }
    }

    /// Read a job's cached result descriptor.
    pub async fn result(&self, job_id: &str) -> Option<VideoResult> {
        self.results.get(&result_key(job_id)).await
    }

    /// Read a job's cached storyboard.
    pub async fn storyboard(&self, job_id: &str) -> Option<Storyboard> {
        self.storyboards.get(&storyboard_key(job_id)).await
    }

    /// Accept a job and start orchestrating it in the background.
    ///
    /// Registers the job, claims its exclusive progress handle, and spawns
    /// the per-job task. Returns the job id immediately; progress is
    /// observable through the registry and the event notifier.
    pub async fn submit(&self, request: VideoRequest) -> Result<String, OrchestratorError> {
        let job_id = request.id.clone();
        self.registry.register(request.clone()).await?;
        let handle = self.registry.claim(&job_id).await?;

        metrics::JOBS_SUBMITTED.inc();
        info!(job_id = %job_id, priority = request.priority, "job submitted");
        self.notifier
            .publish_status(
                &job_id,
                JobStatus::Pending,
                0.0,
                Some("Job queued for processing"),
            )
            .await;

        let ctx = StageContext {
            config: self.config.clone(),
            storyboards: Arc::clone(&self.storyboards),
            results: Arc::clone(&self.results),
            assets: Arc::clone(&self.assets),
            speech: Arc::clone(&self.speech),
            renderer: Arc::clone(&self.renderer),
            notifier: Arc::clone(&self.notifier),
            webhook: self.webhook.clone(),
            planner: ScenePlanner::new(),
        };
        let job_slots = Arc::clone(&self.job_slots);

        tokio::spawn(async move {
            let Ok(_permit) = job_slots.acquire_owned().await else {
                return;
            };
            Self::run_and_finalize(ctx, request, handle).await;
        });

        Ok(job_id)
    }

    /// Cooperatively cancel a job.
    ///
    /// The in-flight stage, if any, finishes; the pipeline stops before the
    /// next stage. Rejected once the job is terminal.
    pub async fn cancel(&self, job_id: &str) -> Result<(), OrchestratorError> {
        self.registry.cancel(job_id).await?;
        let pct = self
            .registry
            .snapshot(job_id)
            .await
            .map(|p| p.overall_progress)
            .unwrap_or(0.0);
        self.notifier
            .publish_status(job_id, JobStatus::Cancelled, pct, Some("Job cancelled"))
            .await;
        Ok(())
    }

    async fn run_and_finalize(
        ctx: StageContext<A, S, R>,
        request: VideoRequest,
        handle: ProgressHandle,
    ) {
        let job_id = request.id.clone();
        let outcome = Self::run_pipeline(&ctx, &request, &handle).await;

        match outcome {
            Ok(JobOutcome::Completed(result)) => {
                metrics::JOBS_COMPLETED.inc();
                ctx.notifier
                    .publish_completed(&job_id, &result.video_url, result.duration)
                    .await;
                info!(job_id = %job_id, video_url = %result.video_url, "job completed");
            }
            Ok(JobOutcome::Cancelled) => {
                metrics::JOBS_CANCELLED.inc();
                ctx.notifier
                    .publish_log(&job_id, "info", "orchestration stopped: job cancelled")
                    .await;
                info!(job_id = %job_id, "orchestration stopped after cancellation");
            }
            Err(err) => {
                // A cancellation racing an in-flight stage surfaces here as a
                // rejected transition; the committed state stays cancelled.
                if handle.is_cancelled().await {
                    metrics::JOBS_CANCELLED.inc();
                    ctx.notifier
                        .publish_log(&job_id, "info", "orchestration stopped: job cancelled")
                        .await;
                    info!(job_id = %job_id, "orchestration stopped after cancellation");
                    return;
                }

                let message = err.to_string();
                if let Err(e) = handle.fail(&message).await {
                    warn!(job_id = %job_id, "could not record failure: {}", e);
                }
                metrics::JOBS_FAILED.inc();
                ctx.notifier.publish_failed(&job_id, &message).await;
                error!(job_id = %job_id, "job failed: {}", message);
            }
        }
    }

    /// The stage sequence. Artifacts written to the cache are left in place
    /// on failure for diagnostic inspection; nothing is retried here.
    async fn run_pipeline(
        ctx: &StageContext<A, S, R>,
        request: &VideoRequest,
        handle: &ProgressHandle,
    ) -> Result<JobOutcome, OrchestratorError> {
        let job_id = request.id.as_str();
        let sb_key = storyboard_key(job_id);

        // Stage 1: scene planning
        if handle.is_cancelled().await {
            return Ok(JobOutcome::Cancelled);
        }
        let stage_start = Instant::now();
        handle.transition(JobStatus::ScenePlanning).await?;
        handle.set_step("Planning video scenes").await;

        let scenes = ctx
            .planner
            .plan(&request.prompt, request.duration_target, request.scene_count);
        let total_scenes = scenes.len();
        handle.set_total_scenes(total_scenes).await;
        metrics::SCENES_PLANNED.observe(total_scenes as f64);

        let storyboard = Storyboard::new(
            job_id,
            &request.prompt,
            scenes,
            request.duration_target as f64,
        );
        ctx.storyboards.set(&sb_key, storyboard).await;

        handle.set_progress(PROGRESS_PLANNED).await;
        handle
            .log(format!("scene planning completed: {} scenes", total_scenes))
            .await;
        metrics::STAGE_DURATION
            .with_label_values(&["scene_planning"])
            .observe(stage_start.elapsed().as_secs_f64());
        info!(job_id = %job_id, scenes = total_scenes, "scene planning completed");
        ctx.notifier
            .publish_status(
                job_id,
                JobStatus::ScenePlanning,
                handle.progress().await,
                Some("Scene planning completed"),
            )
            .await;

        // Stage 2: asset retrieval
        if handle.is_cancelled().await {
            return Ok(JobOutcome::Cancelled);
        }
        let stage_start = Instant::now();
        handle.transition(JobStatus::AssetRetrieval).await?;
        handle.set_step("Retrieving stock footage").await;

        let storyboard = ctx
            .storyboards
            .get(&sb_key)
            .await
            .ok_or_else(|| OrchestratorError::MissingArtifact(sb_key.clone()))?;

        let mut picks = Vec::with_capacity(storyboard.scenes.len());
        for (idx, scene) in storyboard.scenes.iter().enumerate() {
            let pick = ctx.assets.fetch_best_clip(scene).await?;
            handle.set_scenes_processed(idx + 1).await;
            picks.push(pick);
        }
        let resolved = picks.iter().filter(|p| p.clip.is_some()).count();

        let applied = ctx
            .storyboards
            .update(&sb_key, |sb| {
                for pick in &picks {
                    if let Some(scene) = sb.scenes.iter_mut().find(|s| s.id == pick.scene_id) {
                        scene.clip = pick.clip.clone();
                    }
                }
            })
            .await;
        if !applied {
            return Err(OrchestratorError::MissingArtifact(sb_key));
        }

        handle.set_progress(PROGRESS_ASSETS).await;
        handle
            .log(format!(
                "asset retrieval completed: {}/{} scenes resolved",
                resolved, total_scenes
            ))
            .await;
        metrics::STAGE_DURATION
            .with_label_values(&["asset_retrieval"])
            .observe(stage_start.elapsed().as_secs_f64());
        info!(job_id = %job_id, resolved, total_scenes, "asset retrieval completed");
        ctx.notifier
            .publish_status(
                job_id,
                JobStatus::AssetRetrieval,
                handle.progress().await,
                Some("Asset retrieval completed"),
            )
            .await;

        // Stage 3: audio processing
        if handle.is_cancelled().await {
            return Ok(JobOutcome::Cancelled);
        }
        let stage_start = Instant::now();
        handle.transition(JobStatus::AudioProcessing).await?;
        handle.set_step("Generating audio and subtitles").await;

        let narration_text: String = storyboard
            .scenes
            .iter()
            .map(|s| s.narration.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let narration = ctx
            .speech
            .synthesize(&narration_text, &request.language)
            .await?;

        // read-modify-write under the cache's single lock; a plain
        // get-then-set pair here would race concurrent writers
        let subtitle_count = narration.subtitles.len();
        let applied = ctx
            .storyboards
            .update(&sb_key, move |sb| {
                sb.audio_segments = vec![narration.segment];
                sb.subtitles = narration.subtitles;
            })
            .await;
        if !applied {
            return Err(OrchestratorError::MissingArtifact(sb_key));
        }

        handle.set_progress(PROGRESS_AUDIO).await;
        handle
            .log(format!(
                "audio processing completed: {} subtitles",
                subtitle_count
            ))
            .await;
        metrics::STAGE_DURATION
            .with_label_values(&["audio_processing"])
            .observe(stage_start.elapsed().as_secs_f64());
        info!(job_id = %job_id, subtitles = subtitle_count, "audio processing completed");
        ctx.notifier
            .publish_status(
                job_id,
                JobStatus::AudioProcessing,
                handle.progress().await,
                Some("Audio processing completed"),
            )
            .await;

        // Stage 4: rendering
        if handle.is_cancelled().await {
            return Ok(JobOutcome::Cancelled);
        }
        let stage_start = Instant::now();
        handle.transition(JobStatus::Rendering).await?;
        handle.set_step("Rendering video").await;

        let storyboard = ctx
            .storyboards
            .get(&sb_key)
            .await
            .ok_or_else(|| OrchestratorError::MissingArtifact(sb_key.clone()))?;
        let target = RenderTarget {
            output_url: format!("{}/{}/output.mp4", ctx.config.output_base_url, job_id),
            thumbnail_url: format!("{}/{}/thumbnail.jpg", ctx.config.output_base_url, job_id),
            format: "mp4".to_string(),
        };
        let deadline = Duration::from_secs(ctx.config.render_deadline_secs);

        let rendered = ctx
            .renderer
            .render(&storyboard, &target, ctx.config.quality, deadline)
            .await?;

        let result = VideoResult {
            job_id: job_id.to_string(),
            video_url: rendered.video_url,
            thumbnail_url: rendered.thumbnail_url,
            format: rendered.format,
            duration: rendered.duration,
            generated_at: Utc::now(),
            metadata: rendered.metadata,
        };
        ctx.results.set(&result_key(job_id), result.clone()).await;

        // best-effort: a webhook failure never affects the job outcome
        if let Some(callback_url) = &request.callback_url {
            ctx.webhook.notify(callback_url, &result).await;
        }

        handle.set_progress(PROGRESS_RENDERED).await;
        handle.log("video rendering completed".to_string()).await;
        metrics::STAGE_DURATION
            .with_label_values(&["rendering"])
            .observe(stage_start.elapsed().as_secs_f64());

        handle.transition(JobStatus::Completed).await?;
        ctx.notifier
            .publish_status(
                job_id,
                JobStatus::Completed,
                handle.progress().await,
                Some("Video rendering completed"),
            )
            .await;

        Ok(JobOutcome::Completed(result))
    }
}

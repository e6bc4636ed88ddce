//! In-process job registry with per-job ownership of progress records.
//!
//! The registry maps job id -> an entry holding the immutable
//! [`VideoRequest`] and its mutex-guarded [`JobProgress`]. Mutation goes
//! through a single [`ProgressHandle`] per job, claimed exactly once by the
//! orchestration routine that owns the job; every other caller only reads
//! snapshots. Cooperative cancellation is the one mutation allowed past the
//! handle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use super::query::{JobFilter, JobSummary, JobView};
use super::status::{JobStatus, StatusError};
use super::types::{JobProgress, VideoRequest};

/// Errors that can occur on registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No job with the given id.
    #[error("job not found: {0}")]
    NotFound(String),

    /// A job with the same id was already registered.
    #[error("job already registered: {0}")]
    AlreadyRegistered(String),

    /// The progress handle for this job was already claimed.
    #[error("job progress already claimed: {0}")]
    AlreadyClaimed(String),

    /// An operation implied an illegal status transition.
    #[error(transparent)]
    Status(#[from] StatusError),
}

struct JobEntry {
    request: VideoRequest,
    claimed: AtomicBool,
    progress: Mutex<JobProgress>,
}

/// Registry of all known jobs.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Arc<JobEntry>>>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job at `pending`/0%.
    pub async fn register(&self, request: VideoRequest) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&request.id) {
            return Err(RegistryError::AlreadyRegistered(request.id.clone()));
        }
        let entry = JobEntry {
            progress: Mutex::new(JobProgress::new(&request.id)),
            claimed: AtomicBool::new(false),
            request,
        };
        jobs.insert(entry.request.id.clone(), Arc::new(entry));
        Ok(())
    }

    /// Claim the exclusive progress handle for a job.
    ///
    /// Fails with [`RegistryError::AlreadyClaimed`] on the second claim; the
    /// handle is never reissued for the lifetime of the entry.
    pub async fn claim(&self, job_id: &str) -> Result<ProgressHandle, RegistryError> {
        let jobs = self.jobs.read().await;
        let entry = jobs
            .get(job_id)
            .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))?;
        if entry.claimed.swap(true, Ordering::SeqCst) {
            return Err(RegistryError::AlreadyClaimed(job_id.to_string()));
        }
        Ok(ProgressHandle {
            entry: Arc::clone(entry),
        })
    }

    /// Read a snapshot of a job's progress.
    pub async fn snapshot(&self, job_id: &str) -> Option<JobProgress> {
        let entry = {
            let jobs = self.jobs.read().await;
            jobs.get(job_id).cloned()
        };
        match entry {
            Some(entry) => Some(entry.progress.lock().await.clone()),
            None => None,
        }
    }

    /// Get the originating request for a job.
    pub async fn request(&self, job_id: &str) -> Option<VideoRequest> {
        let jobs = self.jobs.read().await;
        jobs.get(job_id).map(|e| e.request.clone())
    }

    /// Cooperatively cancel a job.
    ///
    /// Marks the job `cancelled`; an in-flight stage is not interrupted, the
    /// orchestrator checks for cancellation before starting each stage.
    /// Rejected once the job is terminal.
    pub async fn cancel(&self, job_id: &str) -> Result<(), RegistryError> {
        let entry = {
            let jobs = self.jobs.read().await;
            jobs.get(job_id)
                .cloned()
                .ok_or_else(|| RegistryError::NotFound(job_id.to_string()))?
        };
        let mut progress = entry.progress.lock().await;
        progress.status = progress.status.transition(JobStatus::Cancelled)?;
        progress.updated_at = Utc::now();
        tracing::info!(job_id = %job_id, "job cancelled");
        Ok(())
    }

    /// Remove a job from the registry, returning true if it was present.
    pub async fn remove(&self, job_id: &str) -> bool {
        self.jobs.write().await.remove(job_id).is_some()
    }

    /// Number of registered jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Returns true if no jobs are registered.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// List jobs matching the filter, sorted and paginated.
    pub async fn list(&self, filter: &JobFilter) -> Vec<JobView> {
        let entries: Vec<Arc<JobEntry>> = {
            let jobs = self.jobs.read().await;
            jobs.values().cloned().collect()
        };

        let mut views = Vec::with_capacity(entries.len());
        for entry in entries {
            let progress = entry.progress.lock().await.clone();
            let view = JobView::build(&entry.request, &progress);
            if filter.matches(&view) {
                views.push(view);
            }
        }

        filter.sort(&mut views);
        views
            .into_iter()
            .skip(filter.offset)
            .take(filter.effective_limit())
            .collect()
    }

    /// Summary statistics across all registered jobs.
    pub async fn summary(&self) -> JobSummary {
        let entries: Vec<Arc<JobEntry>> = {
            let jobs = self.jobs.read().await;
            jobs.values().cloned().collect()
        };

        let mut summary = JobSummary::default();
        for entry in entries {
            let status = entry.progress.lock().await.status;
            summary.count(status);
        }
        summary
    }
}

/// The exclusive mutation interface for one job's progress record.
///
/// Obtained once per job through [`JobRegistry::claim`]. All updates go
/// through the narrow methods below; direct field mutation is not possible
/// from outside this module.
pub struct ProgressHandle {
    entry: Arc<JobEntry>,
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("job_id", &self.entry.request.id)
            .finish()
    }
}

impl ProgressHandle {
    /// The id of the job this handle controls.
    pub fn job_id(&self) -> &str {
        &self.entry.request.id
    }

    /// The originating request.
    pub fn request(&self) -> &VideoRequest {
        &self.entry.request
    }

    /// Transition the job status, validated by the state machine.
    pub async fn transition(&self, to: JobStatus) -> Result<(), StatusError> {
        let mut progress = self.entry.progress.lock().await;
        progress.status = progress.status.transition(to)?;
        progress.updated_at = Utc::now();
        Ok(())
    }

    /// Advance the overall progress percentage.
    ///
    /// Progress is monotonic: values below the committed one are ignored,
    /// and the value freezes once the job is terminal.
    pub async fn set_progress(&self, pct: f32) {
        let mut progress = self.entry.progress.lock().await;
        if progress.status.is_terminal() {
            return;
        }
        if pct > progress.overall_progress {
            progress.overall_progress = pct.min(100.0);
            progress.updated_at = Utc::now();
        }
    }

    /// The committed progress percentage.
    pub async fn progress(&self) -> f32 {
        self.entry.progress.lock().await.overall_progress
    }

    /// The current status.
    pub async fn status(&self) -> JobStatus {
        self.entry.progress.lock().await.status
    }

    /// Returns true if the job has been cancelled.
    pub async fn is_cancelled(&self) -> bool {
        self.entry.progress.lock().await.status == JobStatus::Cancelled
    }

    /// Set the current step description.
    pub async fn set_step(&self, step: impl Into<String>) {
        let mut progress = self.entry.progress.lock().await;
        progress.current_step = step.into();
        progress.updated_at = Utc::now();
    }

    /// Append a line to the job's event log.
    pub async fn log(&self, message: impl Into<String>) {
        let mut progress = self.entry.progress.lock().await;
        progress.logs.push(message.into());
        progress.updated_at = Utc::now();
    }

    /// Record the total scene count once planning is done.
    pub async fn set_total_scenes(&self, total: usize) {
        let mut progress = self.entry.progress.lock().await;
        progress.total_scenes = total;
        progress.updated_at = Utc::now();
    }

    /// Record the number of scenes processed in the current stage.
    pub async fn set_scenes_processed(&self, processed: usize) {
        let mut progress = self.entry.progress.lock().await;
        progress.scenes_processed = processed;
        progress.updated_at = Utc::now();
    }

    /// Record an estimate of the remaining time in seconds.
    pub async fn set_eta(&self, secs: f32) {
        let mut progress = self.entry.progress.lock().await;
        progress.estimated_time_remaining = secs;
        progress.updated_at = Utc::now();
    }

    /// Record a failure: transitions to `failed` and stores the error.
    ///
    /// Fails if the job is already terminal (e.g. a cancellation won the
    /// race); in that case the committed state is left untouched.
    pub async fn fail(&self, error: impl Into<String>) -> Result<(), StatusError> {
        let mut progress = self.entry.progress.lock().await;
        progress.status = progress.status.transition(JobStatus::Failed)?;
        progress.error = Some(error.into());
        progress.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str) -> VideoRequest {
        let mut request = VideoRequest::new("A forest stream. Sunlight through leaves.", 20);
        request.id = id.to_string();
        request
    }

    #[tokio::test]
    async fn test_register_and_snapshot() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();

        let snapshot = registry.snapshot("job-1").await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Pending);
        assert_eq!(snapshot.overall_progress, 0.0);
        assert!(registry.snapshot("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let err = registry.register(request("job-1")).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn test_second_claim_fails() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();

        let _handle = registry.claim("job-1").await.unwrap();
        let err = registry.claim("job-1").await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyClaimed(_)));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();

        handle.set_progress(40.0).await;
        handle.set_progress(20.0).await; // ignored
        assert_eq!(handle.progress().await, 40.0);

        handle.set_progress(60.0).await;
        assert_eq!(handle.progress().await, 60.0);
    }

    #[tokio::test]
    async fn test_progress_freezes_after_failure() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();

        handle.transition(JobStatus::ScenePlanning).await.unwrap();
        handle.set_progress(20.0).await;
        handle.fail("planner exploded").await.unwrap();
        handle.set_progress(80.0).await; // frozen

        let snapshot = registry.snapshot("job-1").await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Failed);
        assert_eq!(snapshot.overall_progress, 20.0);
        assert_eq!(snapshot.error.as_deref(), Some("planner exploded"));
    }

    #[tokio::test]
    async fn test_cancel_freezes_progress_and_rejects_updates() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();

        handle.transition(JobStatus::ScenePlanning).await.unwrap();
        handle.set_progress(20.0).await;
        registry.cancel("job-1").await.unwrap();

        assert!(handle.is_cancelled().await);
        handle.set_progress(40.0).await;
        assert_eq!(handle.progress().await, 20.0);

        // A later stage transition loses to the cancellation.
        let err = handle.transition(JobStatus::AssetRetrieval).await.unwrap_err();
        assert!(matches!(err, StatusError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_cancel_terminal_job_rejected() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();
        handle.transition(JobStatus::ScenePlanning).await.unwrap();
        handle.fail("boom").await.unwrap();

        let err = registry.cancel("job-1").await.unwrap_err();
        assert!(matches!(err, RegistryError::Status(_)));
    }

    #[tokio::test]
    async fn test_fail_after_cancel_leaves_state_untouched() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();
        registry.cancel("job-1").await.unwrap();

        assert!(handle.fail("too late").await.is_err());
        let snapshot = registry.snapshot("job-1").await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Cancelled);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_step_log_and_counters() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        let handle = registry.claim("job-1").await.unwrap();

        handle.set_step("Planning video scenes").await;
        handle.log("scene planning started").await;
        handle.set_total_scenes(3).await;
        handle.set_scenes_processed(1).await;
        handle.set_eta(42.0).await;

        let snapshot = registry.snapshot("job-1").await.unwrap();
        assert_eq!(snapshot.current_step, "Planning video scenes");
        assert_eq!(snapshot.logs, vec!["scene planning started".to_string()]);
        assert_eq!(snapshot.total_scenes, 3);
        assert_eq!(snapshot.scenes_processed, 1);
        assert_eq!(snapshot.estimated_time_remaining, 42.0);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = JobRegistry::new();
        registry.register(request("job-1")).await.unwrap();
        assert_eq!(registry.len().await, 1);
        assert!(registry.remove("job-1").await);
        assert!(!registry.remove("job-1").await);
        assert!(registry.is_empty().await);
    }
}

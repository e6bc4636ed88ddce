//! Prometheus metrics for the pipeline core.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Jobs accepted by the orchestrator.
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("storyreel_jobs_submitted_total", "Total jobs submitted").unwrap()
});

/// Jobs that reached the completed status.
pub static JOBS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "storyreel_jobs_completed_total",
        "Total jobs completed successfully",
    )
    .unwrap()
});

/// Jobs that reached the failed status.
pub static JOBS_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("storyreel_jobs_failed_total", "Total jobs that failed").unwrap()
});

/// Jobs that were cancelled.
pub static JOBS_CANCELLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "storyreel_jobs_cancelled_total",
        "Total jobs cancelled before completion",
    )
    .unwrap()
});

/// Wall-clock duration of each pipeline stage.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "storyreel_stage_duration_seconds",
            "Duration of pipeline stages",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 1800.0, 3600.0]),
        &["stage"], // "scene_planning", "asset_retrieval", "audio_processing", "rendering"
    )
    .unwrap()
});

/// Scenes produced per storyboard.
pub static SCENES_PLANNED: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("storyreel_scenes_planned", "Scenes planned per storyboard")
            .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 12.0, 20.0]),
    )
    .unwrap()
});

/// Requests to external services (stock footage, webhooks).
pub static EXTERNAL_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "storyreel_external_requests_total",
            "Total external service requests",
        ),
        &["service", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_COMPLETED.clone()),
        Box::new(JOBS_FAILED.clone()),
        Box::new(JOBS_CANCELLED.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(SCENES_PLANNED.clone()),
        Box::new(EXTERNAL_REQUESTS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }
}

//! Job listing, filtering, sorting and summary statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::JobStatus;
use super::types::{JobProgress, VideoRequest};

/// Hard cap on page size regardless of what the caller asks for.
const MAX_PAGE_SIZE: usize = 100;

/// Length the prompt is truncated to in list views.
const PROMPT_PREVIEW_CHARS: usize = 100;

/// Column to sort job listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Progress,
    DurationTarget,
    Priority,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter and pagination parameters for job listings.
#[derive(Debug, Clone)]
pub struct JobFilter {
    /// Only jobs with this status.
    pub status: Option<JobStatus>,
    /// Only jobs with this priority.
    pub priority: Option<u8>,
    /// Only jobs created at or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Only jobs created at or before this instant.
    pub created_before: Option<DateTime<Utc>>,
    /// Page size (capped at 100).
    pub limit: usize,
    /// Number of matching rows to skip.
    pub offset: usize,
    /// Sort column.
    pub sort_by: JobSort,
    /// Sort direction.
    pub order: SortOrder,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            created_after: None,
            created_before: None,
            limit: 50,
            offset: 0,
            sort_by: JobSort::default(),
            order: SortOrder::default(),
        }
    }
}

impl JobFilter {
    /// Create a filter with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Only jobs created at or after `instant`.
    pub fn created_after(mut self, instant: DateTime<Utc>) -> Self {
        self.created_after = Some(instant);
        self
    }

    /// Only jobs created at or before `instant`.
    pub fn created_before(mut self, instant: DateTime<Utc>) -> Self {
        self.created_before = Some(instant);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the pagination offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the sort column and direction.
    pub fn sorted_by(mut self, sort_by: JobSort, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    /// Page size after applying the hard cap.
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_PAGE_SIZE)
    }

    /// Returns true if the view passes all filter predicates.
    pub fn matches(&self, view: &JobView) -> bool {
        if let Some(status) = self.status {
            if view.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if view.priority != priority {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if view.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if view.created_at > before {
                return false;
            }
        }
        true
    }

    /// Sort views in place by the configured column and direction.
    pub fn sort(&self, views: &mut [JobView]) {
        match self.sort_by {
            JobSort::CreatedAt => views.sort_by_key(|v| v.created_at),
            JobSort::UpdatedAt => views.sort_by_key(|v| v.updated_at),
            JobSort::Progress => {
                views.sort_by(|a, b| a.overall_progress.total_cmp(&b.overall_progress))
            }
            JobSort::DurationTarget => views.sort_by_key(|v| v.duration_target),
            JobSort::Priority => views.sort_by_key(|v| v.priority),
        }
        if self.order == SortOrder::Desc {
            views.reverse();
        }
    }
}

/// A read-only row in a job listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobView {
    /// Job identifier.
    pub job_id: String,
    /// Prompt preview, truncated to 100 characters.
    pub prompt: String,
    /// Current status.
    pub status: JobStatus,
    /// Overall progress percentage.
    pub overall_progress: f32,
    /// Target duration in seconds.
    pub duration_target: u32,
    /// Visual style.
    pub style: String,
    /// Narration voice.
    pub voice: String,
    /// Narration language.
    pub language: String,
    /// Priority (1-10).
    pub priority: u8,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// Last progress update.
    pub updated_at: DateTime<Utc>,
    /// Estimated time remaining in seconds.
    pub estimated_time_remaining: f32,
}

impl JobView {
    /// Build a listing row from a request and its progress snapshot.
    pub fn build(request: &VideoRequest, progress: &JobProgress) -> Self {
        Self {
            job_id: request.id.clone(),
            prompt: request.prompt.chars().take(PROMPT_PREVIEW_CHARS).collect(),
            status: progress.status,
            overall_progress: progress.overall_progress,
            duration_target: request.duration_target,
            style: request.style.clone(),
            voice: request.voice.clone(),
            language: request.language.clone(),
            priority: request.priority,
            created_at: request.created_at,
            updated_at: progress.updated_at,
            estimated_time_remaining: progress.estimated_time_remaining,
        }
    }
}

/// Summary statistics across all registered jobs.
///
/// `in_progress` covers the five active pipeline statuses; every job falls
/// into exactly one bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSummary {
    pub total_jobs: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl JobSummary {
    /// Add one job with the given status to the summary.
    pub fn count(&mut self, status: JobStatus) {
        self.total_jobs += 1;
        match status {
            JobStatus::Completed => self.completed += 1,
            JobStatus::Failed => self.failed += 1,
            JobStatus::Cancelled => self.cancelled += 1,
            JobStatus::Pending => self.pending += 1,
            _ => self.in_progress += 1,
        }
    }
}

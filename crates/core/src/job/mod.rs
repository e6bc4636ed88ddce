//! Job model: requests, progress, storyboards, the status state machine and
//! the per-job ownership registry.

mod query;
mod registry;
mod status;
mod types;

pub use query::{JobFilter, JobSort, JobSummary, JobView, SortOrder};
pub use registry::{JobRegistry, ProgressHandle, RegistryError};
pub use status::{JobStatus, StatusError};
pub use types::{
    AudioSegment, ClipRef, JobProgress, Scene, ShotType, Storyboard, Subtitle, VideoRequest,
    VideoResult,
};

//! Stock footage retrieval.
//!
//! This module provides the [`StockFootage`] search abstraction, the
//! [`PexelsClient`] HTTP implementation, and the [`ClipSelector`] that picks
//! the best clip per scene. The orchestrator only sees the narrow
//! [`AssetRetrieval`] contract.

mod pexels;
mod selector;
mod types;

pub use pexels::{PexelsClient, PexelsConfig};
pub use selector::ClipSelector;
pub use types::{AssetError, ScenePick, StockClip};

use async_trait::async_trait;

use crate::job::Scene;

/// A stock footage search backend.
#[async_trait]
pub trait StockFootage: Send + Sync {
    /// Returns the name of this provider implementation.
    fn name(&self) -> &str;

    /// Search for clips matching the query.
    ///
    /// Returns an empty list for "no results"; errors are reserved for
    /// transport and provider failures.
    async fn search_clips(&self, query: &str, per_page: u32)
        -> Result<Vec<StockClip>, AssetError>;
}

/// The asset retrieval contract consumed by the orchestrator.
#[async_trait]
pub trait AssetRetrieval: Send + Sync {
    /// Resolve the best available clip for a scene.
    ///
    /// A pick with no clip means the provider had no match; only transport
    /// failures produce an error.
    async fn fetch_best_clip(&self, scene: &Scene) -> Result<ScenePick, AssetError>;
}

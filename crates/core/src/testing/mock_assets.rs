//! Mock asset retrieval for testing.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::assets::{AssetError, AssetRetrieval, ScenePick, StockClip, StockFootage};
use crate::job::Scene;

/// Mock implementation of the [`StockFootage`] search trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable clip lists
/// - Track search queries for assertions
/// - Simulate transport failures
pub struct MockStockFootage {
    results: RwLock<Vec<StockClip>>,
    queries: RwLock<Vec<String>>,
    next_error: RwLock<Option<AssetError>>,
}

impl Default for MockStockFootage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStockFootage {
    /// Create a mock with no results configured.
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            queries: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
        }
    }

    /// Set the clips returned by subsequent searches.
    pub async fn set_results(&self, results: Vec<StockClip>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: AssetError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get the queries that were searched.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl StockFootage for MockStockFootage {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_clips(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockClip>, AssetError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        self.queries.write().await.push(query.to_string());

        let results = self.results.read().await;
        Ok(results.iter().take(per_page as usize).cloned().collect())
    }
}

/// Mock implementation of the [`AssetRetrieval`] contract.
///
/// Picks the clip with the duration closest to each scene from a
/// configurable pool, records the scenes it was asked about, and can
/// simulate per-call delays (to open cancellation windows) and transport
/// failures.
pub struct MockAssetRetriever {
    clips: RwLock<Vec<StockClip>>,
    recorded: RwLock<Vec<Scene>>,
    next_error: RwLock<Option<AssetError>>,
    delay: RwLock<Duration>,
}

impl Default for MockAssetRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssetRetriever {
    /// Create a mock with an empty clip pool.
    pub fn new() -> Self {
        Self {
            clips: RwLock::new(Vec::new()),
            recorded: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
            delay: RwLock::new(Duration::ZERO),
        }
    }

    /// Set the clip pool picks are drawn from.
    pub async fn set_clips(&self, clips: Vec<StockClip>) {
        *self.clips.write().await = clips;
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: AssetError) {
        *self.next_error.write().await = Some(error);
    }

    /// Simulate slow retrieval.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// The scenes this retriever was asked to resolve.
    pub async fn recorded_scenes(&self) -> Vec<Scene> {
        self.recorded.read().await.clone()
    }

    /// Number of calls made.
    pub async fn call_count(&self) -> usize {
        self.recorded.read().await.len()
    }
}

#[async_trait]
impl AssetRetrieval for MockAssetRetriever {
    async fn fetch_best_clip(&self, scene: &Scene) -> Result<ScenePick, AssetError> {
        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.recorded.write().await.push(scene.clone());

        let clips = self.clips.read().await;
        let best = clips
            .iter()
            .min_by(|a, b| {
                let da = (a.duration - scene.duration).abs();
                let db = (b.duration - scene.duration).abs();
                da.total_cmp(&db)
            })
            .cloned();

        Ok(match best {
            Some(clip) => ScenePick {
                scene_id: scene.id.clone(),
                match_score: 1.0 - (clip.duration - scene.duration).abs() / 10.0,
                clip: Some(clip.to_ref()),
                query: scene.keywords.join(" "),
            },
            None => ScenePick {
                scene_id: scene.id.clone(),
                clip: None,
                query: scene.keywords.join(" "),
                match_score: 0.0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_footage_records_queries_and_truncates() {
        let footage = MockStockFootage::new();
        footage
            .set_results(vec![
                fixtures::clip("a", 5.0),
                fixtures::clip("b", 6.0),
                fixtures::clip("c", 7.0),
            ])
            .await;

        let clips = footage.search_clips("lake", 2).await.unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(footage.recorded_queries().await, vec!["lake".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_footage_error_is_consumed() {
        let footage = MockStockFootage::new();
        footage
            .set_next_error(AssetError::Transport("down".to_string()))
            .await;

        assert!(footage.search_clips("q", 5).await.is_err());
        assert!(footage.search_clips("q", 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_retriever_picks_closest_duration() {
        let retriever = MockAssetRetriever::new();
        retriever
            .set_clips(vec![fixtures::clip("far", 30.0), fixtures::clip("near", 6.0)])
            .await;

        let scene = fixtures::scene("a lake", 5.0);
        let pick = retriever.fetch_best_clip(&scene).await.unwrap();
        assert_eq!(pick.clip.unwrap().clip_id, "near");
        assert_eq!(retriever.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_retriever_empty_pool_yields_no_clip() {
        let retriever = MockAssetRetriever::new();
        let scene = fixtures::scene("a lake", 5.0);
        let pick = retriever.fetch_best_clip(&scene).await.unwrap();
        assert!(pick.clip.is_none());
        assert_eq!(pick.match_score, 0.0);
    }
}

//! Per-scene best-clip selection on top of any footage backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::job::Scene;

use super::types::{AssetError, ScenePick, StockClip};
use super::{AssetRetrieval, StockFootage};

/// Characters of the description used as a fallback query when a scene has
/// no keywords.
const QUERY_DESCRIPTION_CHARS: usize = 50;

/// Keywords joined into the search query.
const QUERY_KEYWORDS: usize = 3;

/// Selects the best clip for each scene from a [`StockFootage`] backend.
///
/// The heuristic is duration proximity: among the clips the search returns,
/// the one whose duration is closest to the scene duration wins, scored as
/// `1.0 - |clip - scene| / 10`.
pub struct ClipSelector<F> {
    footage: Arc<F>,
    per_page: u32,
}

impl<F: StockFootage> ClipSelector<F> {
    /// Create a selector that asks the backend for `per_page` candidates.
    pub fn new(footage: Arc<F>, per_page: u32) -> Self {
        Self { footage, per_page }
    }

    /// Build the search query for a scene: its first keywords, or a
    /// description prefix when keyword extraction found nothing.
    fn build_query(scene: &Scene) -> String {
        if scene.keywords.is_empty() {
            scene
                .description
                .chars()
                .take(QUERY_DESCRIPTION_CHARS)
                .collect()
        } else {
            scene.keywords[..scene.keywords.len().min(QUERY_KEYWORDS)].join(" ")
        }
    }

    fn pick_best(scene: &Scene, clips: &[StockClip]) -> Option<StockClip> {
        clips
            .iter()
            .min_by(|a, b| {
                let da = (a.duration - scene.duration).abs();
                let db = (b.duration - scene.duration).abs();
                da.total_cmp(&db)
            })
            .cloned()
    }
}

#[async_trait]
impl<F: StockFootage> AssetRetrieval for ClipSelector<F> {
    async fn fetch_best_clip(&self, scene: &Scene) -> Result<ScenePick, AssetError> {
        let query = Self::build_query(scene);
        let clips = self.footage.search_clips(&query, self.per_page).await?;

        match Self::pick_best(scene, &clips) {
            Some(best) => {
                let match_score = 1.0 - (best.duration - scene.duration).abs() / 10.0;
                tracing::debug!(
                    scene_id = %scene.id,
                    clip_id = %best.id,
                    clip_duration = best.duration,
                    scene_duration = scene.duration,
                    "selected clip"
                );
                Ok(ScenePick {
                    scene_id: scene.id.clone(),
                    clip: Some(best.to_ref()),
                    query,
                    match_score,
                })
            }
            None => {
                tracing::warn!(scene_id = %scene.id, query = %query, "no clips found for scene");
                Ok(ScenePick {
                    scene_id: scene.id.clone(),
                    clip: None,
                    query,
                    match_score: 0.0,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ShotType;
    use crate::testing::{fixtures, MockStockFootage};

    fn scene(keywords: &[&str], duration: f64) -> Scene {
        Scene {
            id: "scene-1".to_string(),
            description: "A calm lake at dawn with mist over the water".to_string(),
            duration,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            shot_type: ShotType::General,
            narration: String::new(),
            clip: None,
            start_time: 0.0,
            end_time: duration,
        }
    }

    #[tokio::test]
    async fn test_query_uses_first_three_keywords() {
        let footage = Arc::new(MockStockFootage::new());
        let selector = ClipSelector::new(Arc::clone(&footage), 5);

        let scene = scene(&["calm", "lake", "dawn", "mist", "water"], 5.0);
        selector.fetch_best_clip(&scene).await.unwrap();

        let queries = footage.recorded_queries().await;
        assert_eq!(queries, vec!["calm lake dawn".to_string()]);
    }

    #[tokio::test]
    async fn test_query_falls_back_to_description_prefix() {
        let footage = Arc::new(MockStockFootage::new());
        let selector = ClipSelector::new(Arc::clone(&footage), 5);

        let scene = scene(&[], 5.0);
        selector.fetch_best_clip(&scene).await.unwrap();

        let queries = footage.recorded_queries().await;
        assert_eq!(queries[0], "A calm lake at dawn with mist over the water");
        assert!(queries[0].chars().count() <= 50);
    }

    #[tokio::test]
    async fn test_closest_duration_wins() {
        let footage = Arc::new(MockStockFootage::new());
        footage
            .set_results(vec![
                fixtures::clip("far", 20.0),
                fixtures::clip("near", 6.0),
                fixtures::clip("off", 12.0),
            ])
            .await;
        let selector = ClipSelector::new(Arc::clone(&footage), 5);

        let pick = selector.fetch_best_clip(&scene(&["lake"], 5.0)).await.unwrap();
        let clip = pick.clip.unwrap();
        assert_eq!(clip.clip_id, "near");
        assert!((pick.match_score - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_results_yield_empty_pick() {
        let footage = Arc::new(MockStockFootage::new());
        let selector = ClipSelector::new(Arc::clone(&footage), 5);

        let pick = selector.fetch_best_clip(&scene(&["lake"], 5.0)).await.unwrap();
        assert!(pick.clip.is_none());
        assert_eq!(pick.match_score, 0.0);
        assert_eq!(pick.query, "lake");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let footage = Arc::new(MockStockFootage::new());
        footage
            .set_next_error(AssetError::Transport("connection reset".to_string()))
            .await;
        let selector = ClipSelector::new(Arc::clone(&footage), 5);

        let result = selector.fetch_best_clip(&scene(&["lake"], 5.0)).await;
        assert!(matches!(result, Err(AssetError::Transport(_))));
    }
}

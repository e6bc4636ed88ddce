//! Mock renderer for testing.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::job::Storyboard;
use crate::render::{Quality, RenderError, RenderTarget, RenderedVideo, Renderer};

/// Mock implementation of the [`Renderer`] trait.
///
/// Honors the caller-supplied deadline the way a bounded encoder wrapper
/// would: a configured delay longer than the deadline produces
/// [`RenderError::DeadlineExceeded`] instead of finishing late.
pub struct MockRenderer {
    delay: RwLock<Duration>,
    next_error: RwLock<Option<RenderError>>,
    recorded: RwLock<Vec<Storyboard>>,
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderer {
    /// Create a mock renderer that finishes instantly.
    pub fn new() -> Self {
        Self {
            delay: RwLock::new(Duration::ZERO),
            next_error: RwLock::new(None),
            recorded: RwLock::new(Vec::new()),
        }
    }

    /// Simulate render wall-clock time.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Configure the next render to fail with the given error.
    pub async fn set_next_error(&self, error: RenderError) {
        *self.next_error.write().await = Some(error);
    }

    /// The storyboards this renderer was asked to render.
    pub async fn recorded_storyboards(&self) -> Vec<Storyboard> {
        self.recorded.read().await.clone()
    }

    /// Number of renders attempted.
    pub async fn call_count(&self) -> usize {
        self.recorded.read().await.len()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn render(
        &self,
        storyboard: &Storyboard,
        target: &RenderTarget,
        quality: Quality,
        deadline: Duration,
    ) -> Result<RenderedVideo, RenderError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let delay = *self.delay.read().await;
        if delay > deadline {
            tokio::time::sleep(deadline).await;
            return Err(RenderError::DeadlineExceeded(deadline));
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.recorded.write().await.push(storyboard.clone());

        let mut metadata = HashMap::new();
        metadata.insert("preset".to_string(), quality.as_str().to_string());
        metadata.insert("scenes".to_string(), storyboard.scenes.len().to_string());

        Ok(RenderedVideo {
            video_url: target.output_url.clone(),
            thumbnail_url: Some(target.thumbnail_url.clone()),
            format: target.format.clone(),
            duration: storyboard.total_duration,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn target() -> RenderTarget {
        RenderTarget {
            output_url: "s3://videos/job-1/output.mp4".to_string(),
            thumbnail_url: "s3://videos/job-1/thumbnail.jpg".to_string(),
            format: "mp4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_render_success() {
        let renderer = MockRenderer::new();
        let storyboard = fixtures::storyboard("job-1", 3, 30.0);

        let rendered = renderer
            .render(&storyboard, &target(), Quality::Medium, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(rendered.video_url, "s3://videos/job-1/output.mp4");
        assert_eq!(rendered.duration, 30.0);
        assert_eq!(rendered.metadata.get("preset").map(String::as_str), Some("medium"));
        assert_eq!(renderer.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_render_deadline_exceeded() {
        let renderer = MockRenderer::new();
        renderer.set_delay(Duration::from_secs(10)).await;
        let storyboard = fixtures::storyboard("job-1", 1, 10.0);

        let result = renderer
            .render(&storyboard, &target(), Quality::Medium, Duration::ZERO)
            .await;

        assert!(matches!(result, Err(RenderError::DeadlineExceeded(_))));
        assert_eq!(renderer.call_count().await, 0);
    }
}

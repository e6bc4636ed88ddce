//! Pexels stock footage API client.
//!
//! Pexels serves royalty-free clips; the API key goes in the
//! `Authorization` header. Only mp4 renditions are used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{AssetError, StockClip};
use super::StockFootage;

/// Pexels API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexelsConfig {
    /// Pexels API key (required).
    #[serde(default)]
    pub api_key: String,
    /// Search endpoint (default: https://api.pexels.com/videos/search).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minimum clip duration requested from the API, in seconds.
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: u32,
    /// Results per search query.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.pexels.com/videos/search".to_string()
}

fn default_min_duration() -> u32 {
    5
}

fn default_per_page() -> u32 {
    5
}

fn default_timeout() -> u64 {
    30
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            min_duration_secs: default_min_duration(),
            per_page: default_per_page(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Pexels API client.
pub struct PexelsClient {
    client: Client,
    base_url: String,
    api_key: String,
    min_duration_secs: u32,
}

impl PexelsClient {
    /// Create a new Pexels client.
    pub fn new(config: PexelsConfig) -> Result<Self, AssetError> {
        if config.api_key.is_empty() {
            return Err(AssetError::NotConfigured(
                "Pexels API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            min_duration_secs: config.min_duration_secs,
        })
    }
}

#[async_trait]
impl StockFootage for PexelsClient {
    fn name(&self) -> &str {
        "pexels"
    }

    async fn search_clips(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockClip>, AssetError> {
        debug!("pexels search: query='{}', per_page={}", query, per_page);

        let send = self
            .client
            .get(&self.base_url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query.to_string()),
                ("per_page", per_page.to_string()),
                ("min_duration", self.min_duration_secs.to_string()),
            ])
            .send()
            .await;

        let response = match send {
            Ok(response) => response,
            Err(e) => {
                crate::metrics::EXTERNAL_REQUESTS
                    .with_label_values(&["pexels", "error"])
                    .inc();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            crate::metrics::EXTERNAL_REQUESTS
                .with_label_values(&["pexels", "error"])
                .inc();
            return Err(AssetError::Status {
                status: status.as_u16(),
            });
        }

        let search: PexelsSearchResponse = response.json().await?;
        crate::metrics::EXTERNAL_REQUESTS
            .with_label_values(&["pexels", "success"])
            .inc();

        let clips: Vec<StockClip> = search
            .videos
            .into_iter()
            .filter_map(|video| {
                // prefer the mp4 rendition; skip videos without one
                let video_url = video
                    .video_files
                    .iter()
                    .find(|f| f.file_type.as_deref() == Some("video/mp4"))
                    .and_then(|f| f.link.clone())?;

                Some(StockClip {
                    id: video.id.to_string(),
                    url: video.url.unwrap_or_default(),
                    video_url,
                    duration: video.duration.unwrap_or(0.0),
                    width: video.width.unwrap_or(1920),
                    height: video.height.unwrap_or(1080),
                    user_name: video
                        .user
                        .as_ref()
                        .map(|u| u.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    user_url: video
                        .user
                        .as_ref()
                        .and_then(|u| u.url.clone())
                        .unwrap_or_default(),
                    description: query.to_string(),
                })
            })
            .collect();

        debug!("pexels search '{}' returned {} clips", query, clips.len());
        Ok(clips)
    }
}

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideo {
    id: u64,
    url: Option<String>,
    duration: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
    user: Option<PexelsUser>,
    #[serde(default)]
    video_files: Vec<PexelsVideoFile>,
}

#[derive(Debug, Deserialize)]
struct PexelsUser {
    name: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideoFile {
    file_type: Option<String>,
    link: Option<String>,
}

//! REST client for the YouTube Data API v3.

use std::time::Duration;

use async_trait::async_trait;
use labelbase_core::providers::{MetadataError, VideoMetadata, VideoMetadataProvider};
use serde::de::DeserializeOwned;

use crate::error::YouTubeError;
use crate::types::{ChannelItem, ListResponse, VideoItem};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Parts requested from the `videos` endpoint.
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics,status";

/// Connection settings for [`YouTubeClient`].
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    /// API root without trailing slash, e.g. [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl YouTubeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the YouTube Data API.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Build a client with its own connection pool.
    pub fn new(config: YouTubeConfig) -> Result<Self, YouTubeError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: YouTubeConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw `videos` item for a single id.
    ///
    /// Returns [`YouTubeError::VideoNotFound`] when the id is unknown,
    /// private, or deleted (the API answers 200 with an empty item list).
    pub async fn get_video(&self, video_id: &str) -> Result<VideoItem, YouTubeError> {
        let response: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", VIDEO_PARTS), ("id", video_id)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeError::VideoNotFound(video_id.to_string()))
    }

    /// Fetch the channel's default avatar URL, if any.
    pub async fn get_channel_logo(&self, channel_id: &str) -> Result<Option<String>, YouTubeError> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "snippet"), ("id", channel_id)])
            .await?;
        Ok(response.items.first().and_then(ChannelItem::logo_url))
    }

    /// Fetch full metadata for a video: the video item plus, best-effort,
    /// the channel logo. A failing channel lookup only logs a warning.
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, YouTubeError> {
        let item = self.get_video(video_id).await?;

        let channel_logo = match item.snippet.channel_id.as_deref() {
            Some(channel_id) => match self.get_channel_logo(channel_id).await {
                Ok(logo) => logo,
                Err(e) => {
                    tracing::warn!(video_id, channel_id, error = %e, "Channel lookup failed");
                    None
                }
            },
            None => None,
        };

        tracing::info!(video_id, "Fetched video metadata");
        Ok(item.into_metadata(channel_logo, chrono::Utc::now()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let response = self
            .client
            .get(format!("{}/{resource}", self.base_url))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoMetadataProvider for YouTubeClient {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        self.fetch_metadata(video_id).await.map_err(MetadataError::from)
    }
}

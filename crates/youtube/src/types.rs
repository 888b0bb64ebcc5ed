//! Wire types for the subset of the YouTube Data API v3 we consume, and
//! their conversion into [`VideoMetadata`].

use std::collections::HashMap;

use labelbase_core::duration::iso8601_to_seconds;
use labelbase_core::providers::VideoMetadata;
use labelbase_core::types::Timestamp;
use labelbase_core::video_url::canonical_url;
use serde::Deserialize;

/// `GET /videos` and `GET /channels` share the `{ "items": [...] }` shape.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub duration: Option<String>,
    /// `"true"` or `"false"`, as a string.
    pub caption: Option<String>,
    #[serde(default)]
    pub content_rating: HashMap<String, serde_json::Value>,
}

/// Counters arrive as decimal strings and may be omitted when hidden.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub privacy_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    #[serde(default)]
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub thumbnails: HashMap<String, Thumbnail>,
}

impl ChannelItem {
    /// URL of the channel's default-size avatar.
    pub fn logo_url(&self) -> Option<String> {
        self.snippet.thumbnails.get("default").map(|t| t.url.clone())
    }
}

fn parse_count(value: Option<&str>) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Likes per view scaled to a five-point rating, two decimals.
pub fn like_rating(likes: i64, views: i64) -> f64 {
    let ratio = likes as f64 / views.max(1) as f64 * 5.0;
    (ratio * 100.0).round() / 100.0
}

impl VideoItem {
    /// Flatten the API item into the persisted metadata shape.
    pub fn into_metadata(self, channel_logo: Option<String>, fetched_at: Timestamp) -> VideoMetadata {
        let views = parse_count(self.statistics.view_count.as_deref());
        let like_count = parse_count(self.statistics.like_count.as_deref());
        let comment_count = parse_count(self.statistics.comment_count.as_deref());
        let length_seconds = self
            .content_details
            .duration
            .as_deref()
            .and_then(iso8601_to_seconds)
            .unwrap_or(0);
        let age_restricted = self
            .content_details
            .content_rating
            .get("ytRating")
            .and_then(|v| v.as_str())
            == Some("ytAgeRestricted");
        let thumbnail_url = self
            .snippet
            .thumbnails
            .get("high")
            .or_else(|| self.snippet.thumbnails.get("default"))
            .map(|t| t.url.clone());

        VideoMetadata {
            url: canonical_url(&self.id),
            title: self.snippet.title.unwrap_or_default(),
            description: self.snippet.description,
            channel: self.snippet.channel_title,
            channel_id: self.snippet.channel_id,
            channel_logo,
            duration: self.content_details.duration,
            length_seconds,
            views,
            like_count,
            comment_count,
            rating: like_rating(like_count, views),
            publish_date: self.snippet.published_at,
            keywords: self.snippet.tags,
            thumbnail_url,
            captions: self.content_details.caption.as_deref() == Some("true"),
            age_restricted,
            privacy_status: self.status.privacy_status,
            metadata_fetched_at: fetched_at,
            video_id: self.id,
        }
    }
}

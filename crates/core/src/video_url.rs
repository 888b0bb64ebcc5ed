//! YouTube URL parsing.
//!
//! Extracts the external video identifier (the short code YouTube uses as
//! the natural key of a video) from the URL shapes users paste in practice.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Host-and-path prefixes that carry the video id in the path.
const PATH_ID_PATTERN: &str = r"^(?:https?://)?(?:(?:www|m)\.)?(?:youtube\.com/(?:embed|v|shorts)/|youtu\.be/)([A-Za-z0-9_-]+)(?:[/?#&].*)?$";

/// `youtube.com/watch?...v=<id>...` with `v` at any query position.
const WATCH_PATTERN: &str =
    r"^(?:https?://)?(?:(?:www|m)\.)?youtube\.com/watch/?\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)(?:[&#].*)?$";

static PATH_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATH_ID_PATTERN).expect("valid regex"));

static WATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WATCH_PATTERN).expect("valid regex"));

/// Extract the video identifier from a YouTube URL.
///
/// Accepts `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>`,
/// `/v/<id>` and `/shorts/<id>`, with or without a scheme and with an
/// optional `www.` or `m.` host prefix.
///
/// ```
/// use labelbase_core::video_url::extract_video_id;
///
/// assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc123").unwrap(), "abc123");
/// assert_eq!(extract_video_id("https://youtu.be/abc123?t=42").unwrap(), "abc123");
/// assert!(extract_video_id("https://vimeo.com/12345").is_err());
/// ```
pub fn extract_video_id(url: &str) -> Result<String, CoreError> {
    let url = url.trim();

    WATCH_RE
        .captures(url)
        .or_else(|| PATH_ID_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CoreError::InvalidInput(format!("Invalid YouTube URL format: {url}")))
}

/// Canonical watch URL for a video id. This is the reference handed to the
/// LLM provider and stored in the metadata blob.
pub fn canonical_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

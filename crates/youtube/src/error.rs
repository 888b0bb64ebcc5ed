use labelbase_core::providers::MetadataError;

/// Errors from the YouTube Data API layer.
#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// YouTube returned a non-2xx status code.
    #[error("YouTube API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The request succeeded but no video with that id is visible.
    #[error("Video {0} not found or not accessible")]
    VideoNotFound(String),
}

impl YouTubeError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport failures, `429 Too Many Requests` and 5xx responses are
    /// transient. Everything else (bad key, quota exhausted, unknown video,
    /// undecodable body) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_builder() && !e.is_decode(),
            Self::ApiError { status, .. } => *status == 429 || *status >= 500,
            Self::VideoNotFound(_) => false,
        }
    }
}

impl From<YouTubeError> for MetadataError {
    fn from(err: YouTubeError) -> Self {
        if err.is_transient() {
            MetadataError::Transient(err.to_string())
        } else {
            MetadataError::Permanent(err.to_string())
        }
    }
}

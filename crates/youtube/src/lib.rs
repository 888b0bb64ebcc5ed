//! YouTube Data API v3 client.
//!
//! Implements [`VideoMetadataProvider`](labelbase_core::providers::VideoMetadataProvider)
//! by querying the `videos` endpoint (snippet, content details, statistics,
//! status) and, best-effort, the `channels` endpoint for the channel logo.

pub mod client;
pub mod error;
pub mod types;

pub use client::{YouTubeClient, YouTubeConfig};
pub use error::YouTubeError;

//! Domain primitives shared by every LabelBase crate.
//!
//! Nothing in here talks to the database or the network directly. The
//! provider traits in [`providers`] are the seams the API layer uses to
//! reach YouTube and the LLM.

pub mod duration;
pub mod error;
pub mod pagination;
pub mod prompt;
pub mod providers;
pub mod retry;
pub mod types;
pub mod video_url;

//! Shared query parameter types for API handlers.

use labelbase_core::pagination::{clamp_limit, clamp_skip, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use serde::Deserialize;

/// Generic pagination parameters (`?skip=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// `(skip, limit)` after defaults and clamping.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_skip(self.skip),
            clamp_limit(self.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        )
    }
}

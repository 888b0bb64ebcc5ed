//! `skip` / `limit` pagination defaults and clamping for list endpoints.

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Largest page a caller may request.
pub const MAX_LIST_LIMIT: i64 = 1_000;

/// Clamp a user-provided limit to `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided skip to non-negative.
pub fn clamp_skip(skip: Option<i64>) -> i64 {
    skip.unwrap_or(0).max(0)
}

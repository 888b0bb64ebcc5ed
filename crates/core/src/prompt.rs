//! Prompt text validation and the content hash used as the reuse key.
//!
//! Prompt reuse matches the user prompt text exactly. The SHA-256 digest of
//! the raw text is stored alongside each prompt so the lookup can use an
//! index; the text itself is still compared verbatim after the hash hit.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Maximum accepted length of a single prompt, in characters.
pub const MAX_PROMPT_LENGTH: usize = 20_000;

/// Compute the SHA-256 hex digest of a prompt's exact text.
pub fn content_hash(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    format!("{hash:x}")
}

/// Validate a user prompt: must contain non-whitespace and stay within
/// [`MAX_PROMPT_LENGTH`].
pub fn validate_prompt_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "Prompt must not be empty".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_PROMPT_LENGTH {
        return Err(CoreError::InvalidInput(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed request input (bad URL, empty prompt, bad body).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// The metadata provider could not resolve the supplied video.
    #[error("Error fetching video metadata: {0}")]
    UpstreamFetch(String),

    /// The LLM provider failed to produce a result.
    #[error("Error running prompt: {0}")]
    UpstreamGeneration(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

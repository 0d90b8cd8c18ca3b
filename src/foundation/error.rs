/// Result alias used across the crate.
pub type GlassResult<T> = Result<T, GlassError>;

/// Error taxonomy for effect construction, field evaluation and host interaction.
#[derive(thiserror::Error, Debug)]
pub enum GlassError {
    /// Invalid configuration: missing or degenerate geometry, out-of-range options.
    #[error("validation error: {0}")]
    Validation(String),

    /// A host primitive is unavailable or rejected a request.
    #[error("host error: {0}")]
    Host(String),

    /// Field generation or software compositing failed.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Configuration could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlassError {
    /// Build a [`GlassError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlassError::Host`].
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`GlassError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`GlassError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for GlassError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

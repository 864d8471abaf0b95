/// Convenience result type used across vmerge.
pub type MergeResult<T> = Result<T, MergeError>;

/// Top-level error taxonomy used by the merge APIs.
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    /// Invalid caller-provided data or API misuse.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source has no decodable first video track.
    #[error("unreadable source: {0}")]
    UnreadableSource(String),

    /// A composition request could not be assembled from the given
    /// sources and layout plan.
    #[error("request build failed: {0}")]
    BuildFailed(String),

    /// The external exporter reported a failure.
    #[error("export error: {0}")]
    Export(String),

    /// The in-flight export was cancelled before completion.
    #[error("export cancelled")]
    Cancelled,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MergeError {
    /// Build a [`MergeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MergeError::UnreadableSource`] value.
    pub fn unreadable_source(msg: impl Into<String>) -> Self {
        Self::UnreadableSource(msg.into())
    }

    /// Build a [`MergeError::BuildFailed`] value.
    pub fn build_failed(msg: impl Into<String>) -> Self {
        Self::BuildFailed(msg.into())
    }

    /// Build a [`MergeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`MergeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

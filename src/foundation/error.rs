use std::path::{Path, PathBuf};

/// Convenience result type used across storyreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error type for every fallible storyreel operation.
///
/// All variants are fatal to a render run; nothing in the crate retries or degrades.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// An input image is missing or could not be decoded.
    #[error("load error: '{}': {message}", path.display())]
    Load {
        /// Offending input path.
        path: PathBuf,
        /// Decoder or IO message.
        message: String,
    },

    /// Invalid configuration, detected before any image is decoded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The frame sink rejected a frame or failed to start/finalize.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// IO failures carrying `anyhow` context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Load`] for `path`.
    pub fn load(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Build a [`ReelError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ReelError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Return `true` for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Return `true` for load errors.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Return `true` for encoding errors.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

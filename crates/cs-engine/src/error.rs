//! Error types for the playback engine.

use cs_core::CoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The requested scene is not registered.
    #[error("scene not found: \"{0}\"")]
    SceneNotFound(String),

    /// The cursor moved past the last step; the chain was aborted.
    #[error("scene \"{scene}\" has no step at index {index}")]
    CursorOverrun {
        /// Scene being played.
        scene: String,
        /// The out-of-range index.
        index: usize,
    },

    /// The engine task has stopped.
    #[error("playback engine is not running")]
    EngineUnavailable,

    /// A model error.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SceneNotFound(name) => Self::SceneNotFound(name),
            other => Self::Core(other),
        }
    }
}

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the script registry and scene validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The requested scene name is not registered.
    #[error("scene not found: \"{0}\"")]
    SceneNotFound(String),

    /// A scene with the same name is already registered.
    #[error("scene already exists: \"{0}\"")]
    DuplicateScene(String),

    /// The scene has no steps at all.
    #[error("scene \"{0}\" has no steps")]
    EmptyScene(String),

    /// The last step of the scene is not `Complete`.
    #[error("scene \"{0}\" does not end with a COMPLETE step")]
    MissingComplete(String),

    /// A step follows a `Complete` step and could never run.
    #[error("scene \"{scene}\" has a step after COMPLETE at index {index}")]
    StepAfterComplete {
        /// Name of the offending scene.
        scene: String,
        /// Index of the first unreachable step.
        index: usize,
    },
}

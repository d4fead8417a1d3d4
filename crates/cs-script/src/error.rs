use std::path::PathBuf;

use cs_core::CoreError;

use crate::diagnostics::Diagnostic;

/// Alias for `Result<T, ScriptError>`.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors raised while loading or compiling scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A script file or directory could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The script is not valid JSON or does not match the schema.
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),

    /// A step carries a `type` tag the compiler does not know.
    #[error("scene \"{scene}\" step {index}: unhandled step type \"{tag}\"")]
    UnhandledStepVariant {
        /// Scene containing the step.
        scene: String,
        /// Index of the step.
        index: usize,
        /// The unknown tag.
        tag: String,
    },

    /// A step lacks a field its type requires.
    #[error("scene \"{scene}\" step {index}: missing field \"{field}\"")]
    MissingField {
        /// Scene containing the step.
        scene: String,
        /// Index of the step.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Compilation produced error diagnostics.
    #[error("script has {} error(s), first: {}", .0.len(), first_message(.0))]
    Invalid(Vec<Diagnostic>),

    /// A model invariant was violated.
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.message.clone())
        .unwrap_or_default()
}

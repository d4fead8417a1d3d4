//! Core types for crtscene: steps, scenes, dialogue bubbles, and the script registry.
//!
//! This crate defines the data model that scripts compile into and that the
//! playback engine walks. It is independent of the script format; you can
//! build a [`Scene`] programmatically with the [`Step`] builders.

/// Dialogue bubbles and their identifiers.
pub mod bubble;
/// Error types used throughout the crate.
pub mod error;
/// Name-to-scene registry with load-time validation.
pub mod registry;
/// Immutable, named step sequences.
pub mod scene;
/// Speakers and their presentation slugs.
pub mod speaker;
/// Steps and their payloads.
pub mod step;
/// Display variables mutated by `SetValue` steps.
pub mod variables;

/// Re-export bubble types.
pub use bubble::{BubbleId, DialogueBubble};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the registry.
pub use registry::ScriptRegistry;
/// Re-export the scene type.
pub use scene::Scene;
/// Re-export the speaker type.
pub use speaker::Speaker;
/// Re-export step types.
pub use step::{Alignment, DialogueLine, Step, StepAction, StepKind};
/// Re-export display variable types.
pub use variables::{DisplayKey, DisplayState, DisplayValue, DisplayVariables};

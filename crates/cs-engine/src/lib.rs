//! Cutscene playback engine.
//!
//! The [`Controller`] is a synchronous state machine that walks a scene one
//! step at a time, with an [`Interpreter`] applying each step's effect. The
//! [`EngineHandle`] runs a controller inside a tokio actor that owns the
//! typing, delay and settle timers, and publishes [`EngineSnapshot`]s for
//! renderers. [`HeadlessPlayer`] plays scenes without any renderer.

/// Adapter between renderers and the engine.
pub mod bridge;
/// Engine configuration.
pub mod config;
/// The playback state machine.
pub mod controller;
/// The async actor.
pub mod engine;
/// Engine errors.
pub mod error;
/// Cloneable engine façade.
pub mod handle;
/// Renderer-less playback.
pub mod headless;
/// The step interpreter.
pub mod interpreter;
/// Renderer-facing views of the state.
pub mod snapshot;
/// Controller-owned state.
pub mod state;

pub use bridge::{InputEvent, Renderer, RendererBridge, Viewport, run_renderer};
pub use config::EngineConfig;
pub use controller::Controller;
pub use engine::PlaybackEngine;
pub use error::{EngineError, EngineResult};
pub use handle::EngineHandle;
pub use headless::{HeadlessPlayer, PlaybackReport};
pub use interpreter::{Effect, Interpreter, Pending};
pub use snapshot::{BubbleView, EngineSnapshot};
pub use state::{EngineState, PlaybackSession, Ticket};

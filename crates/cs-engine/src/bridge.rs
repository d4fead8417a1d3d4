//! Adapter between a presentation layer and the engine.
//!
//! Renderers turn raw input into [`InputEvent`]s and hand them to a
//! [`RendererBridge`]; they read state back only through snapshots.

use tokio::sync::watch;
use tracing::debug;

use crate::error::EngineResult;
use crate::handle::EngineHandle;
use crate::snapshot::EngineSnapshot;

/// Height of the monitor relative to its width in pixels (4:3).
pub const MONITOR_ASPECT: f64 = 0.75;

/// Terminal cells are about twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 0.5;

/// Input a renderer forwards to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Start the named scene.
    Trigger(String),
    /// Click on a bubble's proceed affordance.
    Proceed,
    /// Confirm key: proceeds when the current step allows it.
    Confirm,
    /// Start the playing scene over.
    Restart,
    /// The viewport changed size.
    Resize {
        /// New width.
        width: u16,
        /// New height.
        height: u16,
    },
}

/// Size of the area the renderer draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Viewport {
    /// Monitor height in cells for a monitor `width` cells wide, keeping 4:3.
    pub fn monitor_height_for(width: u16) -> u16 {
        let height = (f64::from(width) * MONITOR_ASPECT * CELL_ASPECT).round();
        // Bounded by u16::MAX * 0.375.
        height as u16
    }

    /// The largest 4:3 monitor (width, height) that fits in this viewport.
    pub fn monitor_size(&self) -> (u16, u16) {
        let height = Self::monitor_height_for(self.width);
        if height <= self.height {
            return (self.width, height);
        }
        let width = (f64::from(self.height) / (MONITOR_ASPECT * CELL_ASPECT)).floor();
        let width = (width as u16).min(self.width);
        (width, Self::monitor_height_for(width).min(self.height))
    }
}

/// Routes renderer input to an engine and tracks layout state.
#[derive(Debug, Clone)]
pub struct RendererBridge {
    handle: EngineHandle,
    viewport: Option<Viewport>,
}

impl RendererBridge {
    /// Wrap an engine handle.
    pub fn new(handle: EngineHandle) -> Self {
        Self {
            handle,
            viewport: None,
        }
    }

    /// Forward one input event.
    pub async fn dispatch(&mut self, event: InputEvent) -> EngineResult<()> {
        match event {
            InputEvent::Trigger(scene) => {
                if self.handle.snapshot().interaction_disabled() {
                    debug!(scene = %scene, "trigger ignored, interaction disabled");
                    return Ok(());
                }
                self.handle.trigger(scene).await
            }
            InputEvent::Proceed => {
                if !self.handle.snapshot().can_proceed() {
                    debug!("proceed ignored, affordance not enabled");
                    return Ok(());
                }
                self.handle.proceed().await
            }
            InputEvent::Confirm => self.handle.skip_input().await,
            InputEvent::Restart => self.handle.restart().await,
            InputEvent::Resize { width, height } => {
                self.viewport = Some(Viewport { width, height });
                Ok(())
            }
        }
    }

    /// The latest viewport size.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The latest engine snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.handle.snapshot()
    }

    /// The underlying engine handle.
    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }
}

/// Something that draws engine snapshots.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, snapshot: &EngineSnapshot);
}

/// Render the current snapshot, then every change, until the engine stops.
pub async fn run_renderer<R: Renderer + ?Sized>(
    renderer: &mut R,
    mut snapshots: watch::Receiver<EngineSnapshot>,
) {
    let first = snapshots.borrow_and_update().clone();
    renderer.render(&first);
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        renderer.render(&snapshot);
    }
}

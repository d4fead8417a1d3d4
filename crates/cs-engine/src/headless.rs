//! Playback without a renderer: every wait is proceeded automatically.

use std::time::Duration;

use cs_core::{DialogueBubble, ScriptRegistry};
use tokio::time::Instant;
use tracing::debug;

use crate::config::EngineConfig;
use crate::controller::Controller;
use crate::error::EngineResult;
use crate::interpreter::{Effect, Pending};

/// Summary of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Dialogue lines typed to the end.
    pub lines: usize,
    /// Times the player had to proceed a waiting step.
    pub proceeds: usize,
    /// Time spent waiting on effects.
    pub elapsed: Duration,
}

/// Drives a [`Controller`] in-line, playing each scene to its end.
#[derive(Debug)]
pub struct HeadlessPlayer {
    controller: Controller,
    type_interval: Duration,
}

impl HeadlessPlayer {
    /// Create a player over `registry`.
    pub fn new(registry: ScriptRegistry, config: &EngineConfig) -> Self {
        Self {
            controller: Controller::new(registry, config),
            type_interval: config.type_interval,
        }
    }

    /// The underlying controller.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Play `scene` to completion, calling `on_line` for each dialogue bubble
    /// once its text is fully revealed.
    pub async fn play(
        &mut self,
        scene: &str,
        mut on_line: impl FnMut(&DialogueBubble),
    ) -> EngineResult<PlaybackReport> {
        let started = Instant::now();
        let mut lines = 0;
        let mut proceeds = 0;
        let mut pending = self.controller.trigger(scene)?;

        loop {
            if let Some(Pending { ticket, effect }) = pending {
                tokio::time::sleep(effect.duration(self.type_interval)).await;
                if let Effect::Type { chars } = effect {
                    for _ in 0..chars {
                        self.controller.reveal(ticket);
                    }
                    if let Some(bubble) = self.controller.state().bubbles().last() {
                        on_line(bubble);
                        lines += 1;
                    }
                }
                pending = self.controller.resolve(ticket)?;
                continue;
            }

            if !self.controller.state().is_waiting() {
                break;
            }
            debug!("proceeding a waiting step");
            proceeds += 1;
            pending = self.controller.proceed()?;
        }

        Ok(PlaybackReport {
            lines,
            proceeds,
            elapsed: started.elapsed(),
        })
    }
}

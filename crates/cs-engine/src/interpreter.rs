//! The step interpreter: applies the synchronous part of a step and says
//! what remains to be awaited.

use std::time::Duration;

use cs_core::{BubbleId, DialogueBubble, Step, StepAction};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::EngineConfig;
use crate::state::{EngineState, Ticket};

/// The asynchronous remainder of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Reveal `chars` characters of the newest bubble, one per tick.
    Type {
        /// Characters left to reveal.
        chars: usize,
    },
    /// A scripted pause. Cancelled when the step is left early.
    Delay(Duration),
    /// Pause after the bubbles were cleared.
    Settle(Duration),
    /// Nothing to wait for.
    Immediate,
}

impl Effect {
    /// Total time the effect takes when it runs to completion.
    pub fn duration(&self, type_interval: Duration) -> Duration {
        match *self {
            Self::Type { chars } => {
                type_interval.saturating_mul(u32::try_from(chars).unwrap_or(u32::MAX))
            }
            Self::Delay(d) | Self::Settle(d) => d,
            Self::Immediate => Duration::ZERO,
        }
    }
}

/// A running effect, identified by its ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    /// Ticket the effect reports back with.
    pub ticket: Ticket,
    /// What to wait for.
    pub effect: Effect,
}

/// Executes steps against an [`EngineState`].
#[derive(Debug)]
pub struct Interpreter {
    config: EngineConfig,
    rng: StdRng,
}

impl Interpreter {
    /// Create an interpreter. Bubble ids are seeded from `config.seed`.
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config: config.clone(),
            rng,
        }
    }

    /// Apply `step`'s immediate side effects and return what is left to
    /// await.
    ///
    /// `Complete` ends the session before clearing the bubbles, so the scene
    /// counts as finished while the settle delay runs.
    pub fn execute(&mut self, step: &Step, state: &mut EngineState) -> Effect {
        match &step.action {
            StepAction::Dialogue(line) => {
                let bubble = DialogueBubble::new(BubbleId::generate(&mut self.rng), line.clone());
                let chars = bubble.char_count();
                state.push_bubble(bubble);
                if chars == 0 {
                    return Effect::Immediate;
                }
                state.set_typing(true);
                Effect::Type { chars }
            }
            StepAction::Delay { duration_ms } => {
                Effect::Delay(self.config.scaled_delay(Duration::from_millis(*duration_ms)))
            }
            StepAction::SetValue { values } => {
                state.variables_mut().apply(values);
                Effect::Immediate
            }
            StepAction::Reset => {
                state.clear_bubbles();
                Effect::Settle(self.config.settle_delay)
            }
            StepAction::Complete => {
                state.end_session();
                state.clear_bubbles();
                Effect::Settle(self.config.settle_delay)
            }
        }
    }
}

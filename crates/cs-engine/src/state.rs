//! The mutable state owned by a playback controller.

use std::fmt;
use std::sync::Arc;

use cs_core::{DialogueBubble, DisplayVariables, Scene, Step};

/// Generation number identifying the effect of one step execution.
///
/// Completions carrying anything but the current ticket are stale and get
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The scene being played and the index of its current step.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    scene: Arc<Scene>,
    cursor: usize,
}

impl PlaybackSession {
    /// Start a session at step 0.
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene, cursor: 0 }
    }

    /// The scene being played.
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// Index of the current step.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The current step, or `None` if the cursor overran the list.
    pub fn current_step(&self) -> Option<&Step> {
        self.scene.step(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
    auto_advance: bool,
    typing: bool,
}

/// Everything a running effect is allowed to report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEffect {
    /// Whether the step asked to proceed on its own.
    pub auto_advance: bool,
    /// Whether the effect was a typing animation.
    pub typing: bool,
}

/// Playback state: session, bubbles, display variables and the in-flight
/// effect.
#[derive(Debug, Default)]
pub struct EngineState {
    session: Option<PlaybackSession>,
    bubbles: Vec<DialogueBubble>,
    variables: DisplayVariables,
    typing: bool,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl EngineState {
    /// Empty, idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Whether a scene is playing.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The step under the cursor.
    pub fn current_step(&self) -> Option<&Step> {
        self.session.as_ref().and_then(PlaybackSession::current_step)
    }

    /// Bubbles on screen, oldest first.
    pub fn bubbles(&self) -> &[DialogueBubble] {
        &self.bubbles
    }

    /// The display variables.
    pub fn variables(&self) -> &DisplayVariables {
        &self.variables
    }

    /// Whether a typing animation is running.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Whether a scene is playing and its current step has no running
    /// effect, so only a proceed moves it on.
    pub fn is_waiting(&self) -> bool {
        self.session.is_some() && self.in_flight.is_none()
    }

    /// Whether `ticket` belongs to the running effect.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight.is_some_and(|f| f.ticket == ticket)
    }

    /// Ticket of the running effect.
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.map(|f| f.ticket)
    }

    pub(crate) fn start_session(&mut self, scene: Arc<Scene>) {
        self.session = Some(PlaybackSession::new(scene));
    }

    pub(crate) fn end_session(&mut self) {
        self.session = None;
    }

    pub(crate) fn advance_cursor(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.advance();
        }
    }

    pub(crate) fn push_bubble(&mut self, bubble: DialogueBubble) {
        self.bubbles.push(bubble);
    }

    pub(crate) fn clear_bubbles(&mut self) {
        self.bubbles.clear();
    }

    pub(crate) fn last_bubble_mut(&mut self) -> Option<&mut DialogueBubble> {
        self.bubbles.last_mut()
    }

    pub(crate) fn variables_mut(&mut self) -> &mut DisplayVariables {
        &mut self.variables
    }

    pub(crate) fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    /// Register a new running effect and return its ticket.
    pub(crate) fn start_effect(&mut self, auto_advance: bool, typing: bool) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.in_flight = Some(InFlight {
            ticket,
            auto_advance,
            typing,
        });
        ticket
    }

    /// Take the running effect if `ticket` is current.
    pub(crate) fn finish_effect(&mut self, ticket: Ticket) -> Option<ResolvedEffect> {
        if !self.is_current(ticket) {
            return None;
        }
        self.in_flight.take().map(|f| ResolvedEffect {
            auto_advance: f.auto_advance,
            typing: f.typing,
        })
    }

    /// Drop the running effect. A typing animation cut short this way shows
    /// its full text.
    pub(crate) fn cancel_effect(&mut self) -> Option<Ticket> {
        let cancelled = self.in_flight.take()?;
        if cancelled.typing {
            self.complete_typing();
        }
        Some(cancelled.ticket)
    }

    pub(crate) fn complete_typing(&mut self) {
        if let Some(bubble) = self.bubbles.last_mut() {
            bubble.reveal_all();
        }
        self.typing = false;
    }
}

//! Immutable views of the engine state handed to renderers.

use cs_core::{Alignment, DialogueBubble, DisplayState, DisplayVariables, StepKind};
use serde::Serialize;

use crate::state::EngineState;

/// One bubble as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleView {
    /// Bubble id.
    pub id: String,
    /// Speaker name.
    pub speaker: String,
    /// Speaker style slug.
    pub slug: String,
    /// Text revealed so far.
    pub text: String,
    /// Length of the full text in characters.
    pub len: usize,
    /// Side of the monitor.
    pub alignment: Alignment,
    /// Address of the proceed affordance.
    pub proceed_id: String,
    /// The proceed affordance is shown.
    pub proceed_visible: bool,
    /// The proceed affordance accepts clicks (no typing in progress).
    pub proceed_enabled: bool,
}

impl BubbleView {
    fn new(bubble: &DialogueBubble, typing: bool) -> Self {
        Self {
            id: bubble.id.to_string(),
            speaker: bubble.line.speaker.to_string(),
            slug: bubble.line.speaker.slug(),
            text: bubble.visible_text().to_string(),
            len: bubble.char_count(),
            alignment: bubble.line.alignment,
            proceed_id: bubble.id.proceed_button_id(),
            proceed_visible: bubble.proceed_visible,
            proceed_enabled: !typing,
        }
    }

    /// Whether the whole text is visible.
    pub fn is_complete(&self) -> bool {
        self.text.chars().count() >= self.len
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineSnapshot {
    /// Bubbles on screen, oldest first.
    pub bubbles: Vec<BubbleView>,
    /// A typing animation is running.
    pub typing_in_progress: bool,
    /// A scene is playing.
    pub scene_active: bool,
    /// The current step finished and only a proceed moves on.
    pub waiting: bool,
    /// Name of the playing scene.
    pub scene: Option<String>,
    /// Cursor of the playing scene.
    pub step_index: Option<usize>,
    /// Kind of the step under the cursor.
    pub current_step: Option<StepKind>,
    /// Display variables.
    pub variables: DisplayVariables,
    /// Bumped on every published change.
    pub version: u64,
}

impl EngineSnapshot {
    /// Capture `state`.
    pub fn capture(state: &EngineState, version: u64) -> Self {
        let typing = state.is_typing();
        let session = state.session();
        Self {
            bubbles: state
                .bubbles()
                .iter()
                .map(|b| BubbleView::new(b, typing))
                .collect(),
            typing_in_progress: typing,
            scene_active: state.is_active(),
            waiting: state.is_waiting(),
            scene: session.map(|s| s.scene().name().to_string()),
            step_index: session.map(|s| s.cursor()),
            current_step: state.current_step().map(|s| s.kind()),
            variables: state.variables().clone(),
            version,
        }
    }

    /// Scene triggers are ignored while a scene plays.
    pub fn interaction_disabled(&self) -> bool {
        self.scene_active
    }

    /// The dialogue overlay sits above the monitor only during dialogue.
    pub fn dialogue_priority(&self) -> bool {
        self.current_step == Some(StepKind::Dialogue)
    }

    /// Typed view of the recognized display variables.
    pub fn display_state(&self) -> DisplayState {
        DisplayState::from_variables(&self.variables)
    }

    /// The newest bubble.
    pub fn last_bubble(&self) -> Option<&BubbleView> {
        self.bubbles.last()
    }

    /// Whether clicking the newest bubble's proceed affordance does anything.
    pub fn can_proceed(&self) -> bool {
        self.scene_active
            && self
                .last_bubble()
                .is_some_and(|b| b.proceed_visible && b.proceed_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot() {
        let snap = EngineSnapshot::capture(&EngineState::new(), 0);
        assert!(!snap.interaction_disabled());
        assert!(!snap.dialogue_priority());
        assert!(!snap.can_proceed());
        assert!(snap.bubbles.is_empty());
        assert_eq!(snap.display_state(), DisplayState::default());
    }

    #[test]
    fn serializes_for_renderers() {
        let json = serde_json::to_value(EngineSnapshot::default()).unwrap();
        assert_eq!(json["typing_in_progress"], false);
        assert_eq!(json["scene"], serde_json::Value::Null);
        assert!(json["bubbles"].as_array().unwrap().is_empty());
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::speaker::Speaker;
use crate::variables::DisplayValue;

/// Which side of the monitor a dialogue bubble is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Anchored to the left edge.
    #[default]
    Left,
    /// Anchored to the right edge.
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// One line of dialogue: who says what, and on which side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// The speaking character.
    pub speaker: Speaker,
    /// The full text, revealed letter by letter.
    pub text: String,
    /// Side of the monitor the bubble sits on.
    #[serde(rename = "align")]
    pub alignment: Alignment,
}

impl DialogueLine {
    /// Create a dialogue line.
    pub fn new(speaker: impl Into<Speaker>, text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            alignment,
        }
    }

    /// Number of characters the typing effect reveals.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// The effect a step performs when it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepAction {
    /// Append a bubble and type its text.
    Dialogue(DialogueLine),
    /// Pause before continuing.
    Delay {
        /// Pause length in milliseconds.
        #[serde(rename = "duration")]
        duration_ms: u64,
    },
    /// Write display variables.
    SetValue {
        /// Variables to set, by name.
        values: BTreeMap<String, DisplayValue>,
    },
    /// Clear every visible bubble.
    Reset,
    /// End the active scene.
    Complete,
}

/// Discriminant of a [`StepAction`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    /// See [`StepAction::Dialogue`].
    Dialogue,
    /// See [`StepAction::Delay`].
    Delay,
    /// See [`StepAction::SetValue`].
    SetValue,
    /// See [`StepAction::Reset`].
    Reset,
    /// See [`StepAction::Complete`].
    Complete,
}

impl StepKind {
    /// All step kinds, in script-format order.
    pub const ALL: [StepKind; 5] = [
        StepKind::Dialogue,
        StepKind::Delay,
        StepKind::SetValue,
        StepKind::Reset,
        StepKind::Complete,
    ];

    /// The tag used in the script format.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Dialogue => "DIALOGUE",
            Self::Delay => "DELAY",
            Self::SetValue => "SET_VALUE",
            Self::Reset => "RESET",
            Self::Complete => "COMPLETE",
        }
    }

    /// Parse a script-format tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One instruction in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// What the step does.
    #[serde(flatten)]
    pub action: StepAction,
    /// Proceed on its own once the effect resolves.
    #[serde(default)]
    pub auto_advance: bool,
    /// Honor proceed/skip input while the effect is still running.
    #[serde(default)]
    pub skippable: bool,
}

impl Step {
    /// Create a step with both flags off.
    pub fn new(action: StepAction) -> Self {
        Self {
            action,
            auto_advance: false,
            skippable: false,
        }
    }

    /// A dialogue step.
    pub fn dialogue(
        speaker: impl Into<Speaker>,
        text: impl Into<String>,
        alignment: Alignment,
    ) -> Self {
        Self::new(StepAction::Dialogue(DialogueLine::new(
            speaker, text, alignment,
        )))
    }

    /// A delay step lasting `duration_ms` milliseconds.
    pub fn delay(duration_ms: u64) -> Self {
        Self::new(StepAction::Delay { duration_ms })
    }

    /// A step that sets each `(name, value)` pair.
    pub fn set_value<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<DisplayValue>,
    {
        Self::new(StepAction::SetValue {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    /// A reset step.
    pub fn reset() -> Self {
        Self::new(StepAction::Reset)
    }

    /// A complete step.
    pub fn complete() -> Self {
        Self::new(StepAction::Complete)
    }

    /// Set the auto-advance flag.
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// Set the skippable flag.
    pub fn with_skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }

    /// The step's kind.
    pub fn kind(&self) -> StepKind {
        match self.action {
            StepAction::Dialogue(_) => StepKind::Dialogue,
            StepAction::Delay { .. } => StepKind::Delay,
            StepAction::SetValue { .. } => StepKind::SetValue,
            StepAction::Reset => StepKind::Reset,
            StepAction::Complete => StepKind::Complete,
        }
    }

    /// The dialogue line, for dialogue steps.
    pub fn dialogue_line(&self) -> Option<&DialogueLine> {
        match &self.action {
            StepAction::Dialogue(line) => Some(line),
            _ => None,
        }
    }

    /// The pause length, for delay steps.
    pub fn delay_duration(&self) -> Option<Duration> {
        match self.action {
            StepAction::Delay { duration_ms } => Some(Duration::from_millis(duration_ms)),
            _ => None,
        }
    }

    /// Whether this step ends its scene.
    pub fn is_complete(&self) -> bool {
        matches!(self.action, StepAction::Complete)
    }
}

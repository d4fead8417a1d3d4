use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::step::DialogueLine;

/// Symbols bubble ids are drawn from.
pub const BUBBLE_ID_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz1234567890";

/// Length of a bubble id.
pub const BUBBLE_ID_LEN: usize = 30;

/// Identifier of a dialogue bubble, used by renderers for addressing and
/// animation keys.
///
/// Ids are random draws from [`BUBBLE_ID_ALPHABET`]. Collisions are
/// astronomically unlikely but not ruled out; nothing checks for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BubbleId(String);

impl BubbleId {
    /// Draw a fresh id from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..BUBBLE_ID_LEN)
            .map(|_| char::from(BUBBLE_ID_ALPHABET[rng.random_range(0..BUBBLE_ID_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address of this bubble's proceed affordance.
    pub fn proceed_button_id(&self) -> String {
        format!("proceed-button-{}", self.0)
    }
}

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dialogue bubble on screen, with its typing progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueBubble {
    /// Unique id.
    pub id: BubbleId,
    /// What the bubble says.
    pub line: DialogueLine,
    /// Whether the proceed affordance is still shown.
    pub proceed_visible: bool,
    revealed: usize,
    char_count: usize,
}

impl DialogueBubble {
    /// Create a bubble with nothing revealed yet.
    pub fn new(id: BubbleId, line: DialogueLine) -> Self {
        let char_count = line.char_count();
        Self {
            id,
            line,
            proceed_visible: true,
            revealed: 0,
            char_count,
        }
    }

    /// The text revealed so far.
    pub fn visible_text(&self) -> &str {
        let text = &self.line.text;
        text.char_indices()
            .nth(self.revealed)
            .map_or(text.as_str(), |(end, _)| &text[..end])
    }

    /// Number of characters revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Total number of characters.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Reveal one more character. Returns `false` if already complete.
    pub fn reveal_next(&mut self) -> bool {
        if self.is_fully_revealed() {
            return false;
        }
        self.revealed += 1;
        true
    }

    /// Reveal the whole text at once.
    pub fn reveal_all(&mut self) {
        self.revealed = self.char_count;
    }

    /// Whether every character is revealed.
    pub fn is_fully_revealed(&self) -> bool {
        self.revealed >= self.char_count
    }

    /// Hide the proceed affordance so the bubble cannot be advanced twice.
    pub fn hide_proceed(&mut self) {
        self.proceed_visible = false;
    }
}

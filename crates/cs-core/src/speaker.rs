use std::fmt;

use serde::{Deserialize, Serialize};

/// A named character that speaks dialogue lines.
///
/// Speakers are open-ended: scripts name them freely. The display name is
/// shown verbatim above a bubble, while [`Speaker::slug`] gives a stable
/// style key for renderers that color bubbles per speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speaker(String);

impl Speaker {
    /// Create a speaker from its display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Style key: lowercased, with commas, apostrophes, dashes, underscores
    /// and whitespace removed (`MANAGER'S MOM` becomes `managersmom`).
    pub fn slug(&self) -> String {
        self.0
            .chars()
            .filter(|c| !matches!(c, ',' | '\'' | '-' | '_') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Speaker {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Speaker {
    fn from(name: String) -> Self {
        Self(name)
    }
}

//! The on-disk shape of a script, before validation.
//!
//! Every payload field is optional here so that a step with a bad or missing
//! field can be reported by the compiler with its scene and index instead of
//! failing the whole parse with a serde message.

use std::collections::BTreeMap;

use cs_core::{Alignment, DisplayValue};
use serde::{Deserialize, Serialize};

/// A whole script file: scene name to raw steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScript {
    /// Scenes by name.
    pub scenes: BTreeMap<String, Vec<RawStep>>,
}

impl RawScript {
    /// Parse a script from JSON text.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

/// One step as written in the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    /// Step type tag, e.g. `DIALOGUE`.
    #[serde(rename = "type")]
    pub tag: String,
    /// Dialogue speaker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Dialogue text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Dialogue side; left when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    /// Delay length in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Variables written by `SET_VALUE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, DisplayValue>>,
    /// Proceed once the effect resolves.
    #[serde(default)]
    pub auto_advance: bool,
    /// Honor input while the effect runs.
    #[serde(default)]
    pub skippable: bool,
}

impl RawStep {
    /// A raw step with only a tag.
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            speaker: None,
            text: None,
            align: None,
            duration: None,
            values: None,
            auto_advance: false,
            skippable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let script = RawScript::from_json(
            r#"{"scenes": {"greet": [{"type": "DIALOGUE", "speaker": "ENGINEER", "text": "hi"}]}}"#,
        )
        .unwrap();
        let step = &script.scenes["greet"][0];
        assert_eq!(step.tag, "DIALOGUE");
        assert_eq!(step.align, None);
        assert!(!step.auto_advance);
        assert!(!step.skippable);
    }

    #[test]
    fn flags_are_camel_case() {
        let script = RawScript::from_json(
            r#"{"scenes": {"boot": [{"type": "DELAY", "duration": 5, "autoAdvance": true, "skippable": true}]}}"#,
        )
        .unwrap();
        let step = &script.scenes["boot"][0];
        assert_eq!(step.duration, Some(5));
        assert!(step.auto_advance);
        assert!(step.skippable);
    }

    #[test]
    fn unknown_tags_still_parse() {
        let script =
            RawScript::from_json(r#"{"scenes": {"odd": [{"type": "JUMP"}]}}"#).unwrap();
        assert_eq!(script.scenes["odd"][0], RawStep::tagged("JUMP"));
    }
}

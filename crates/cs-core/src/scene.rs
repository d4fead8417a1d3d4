use std::time::Duration;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::step::{Step, StepKind};

/// A named, immutable sequence of steps.
///
/// Construction validates the content invariant the engine relies on: the
/// list is non-empty, ends with `Complete`, and nothing follows a `Complete`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    name: String,
    steps: Vec<Step>,
}

impl Scene {
    /// Build a scene, validating its steps.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> CoreResult<Self> {
        let name = name.into();
        validate_steps(&name, &steps)?;
        Ok(Self { name, steps })
    }

    /// The scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The step at `index`.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false` for a validated scene.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of dialogue lines.
    pub fn dialogue_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind() == StepKind::Dialogue)
            .count()
    }

    /// Sum of all scripted delays (typing and settle time excluded).
    pub fn scripted_delay(&self) -> Duration {
        self.steps.iter().filter_map(Step::delay_duration).sum()
    }
}

/// Check the scene content invariant.
pub fn validate_steps(name: &str, steps: &[Step]) -> CoreResult<()> {
    let Some(last) = steps.last() else {
        return Err(CoreError::EmptyScene(name.to_string()));
    };
    if let Some(index) = steps.iter().position(Step::is_complete) {
        if index + 1 < steps.len() {
            return Err(CoreError::StepAfterComplete {
                scene: name.to_string(),
                index: index + 1,
            });
        }
    }
    if !last.is_complete() {
        return Err(CoreError::MissingComplete(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Alignment;

    fn greet() -> Vec<Step> {
        vec![
            Step::dialogue("ENGINEER", "hi", Alignment::Left),
            Step::complete(),
        ]
    }

    #[test]
    fn valid_scene() {
        let scene = Scene::new("greet", greet()).unwrap();
        assert_eq!(scene.name(), "greet");
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.dialogue_count(), 1);
        assert!(scene.step(1).unwrap().is_complete());
    }

    #[test]
    fn empty_scene_rejected() {
        assert_eq!(
            Scene::new("void", Vec::new()).unwrap_err(),
            CoreError::EmptyScene("void".into())
        );
    }

    #[test]
    fn missing_complete_rejected() {
        let steps = vec![Step::dialogue("ENGINEER", "hi", Alignment::Left)];
        assert_eq!(
            Scene::new("open", steps).unwrap_err(),
            CoreError::MissingComplete("open".into())
        );
    }

    #[test]
    fn step_after_complete_rejected() {
        let steps = vec![Step::complete(), Step::reset(), Step::complete()];
        assert_eq!(
            Scene::new("twice", steps).unwrap_err(),
            CoreError::StepAfterComplete {
                scene: "twice".into(),
                index: 1
            }
        );
    }

    #[test]
    fn scripted_delay_sums_delays() {
        let steps = vec![
            Step::delay(1000),
            Step::reset(),
            Step::delay(2000),
            Step::complete(),
        ];
        let scene = Scene::new("boot", steps).unwrap();
        assert_eq!(scene.scripted_delay(), Duration::from_secs(3));
    }
}

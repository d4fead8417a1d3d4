use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::scene::Scene;

/// Static mapping from scene name to scene.
///
/// Scenes are validated when built and shared read-only afterwards, so a
/// registry handed to the engine can never contain a scene that overruns.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    scenes: BTreeMap<String, Arc<Scene>>,
}

impl ScriptRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from scenes, rejecting duplicate names.
    pub fn from_scenes(scenes: impl IntoIterator<Item = Scene>) -> CoreResult<Self> {
        let mut registry = Self::new();
        for scene in scenes {
            registry.insert(scene)?;
        }
        Ok(registry)
    }

    /// Register a scene. Fails if the name is taken.
    pub fn insert(&mut self, scene: Scene) -> CoreResult<()> {
        if self.scenes.contains_key(scene.name()) {
            return Err(CoreError::DuplicateScene(scene.name().to_string()));
        }
        self.scenes.insert(scene.name().to_string(), Arc::new(scene));
        Ok(())
    }

    /// Move every scene of `other` into this registry.
    pub fn merge(&mut self, other: ScriptRegistry) -> CoreResult<()> {
        for (name, scene) in other.scenes {
            if self.scenes.contains_key(&name) {
                return Err(CoreError::DuplicateScene(name));
            }
            self.scenes.insert(name, scene);
        }
        Ok(())
    }

    /// Look up a scene by name.
    pub fn get_scene(&self, name: &str) -> CoreResult<Arc<Scene>> {
        self.scenes
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::SceneNotFound(name.to_string()))
    }

    /// Whether a scene with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Scene names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// All scenes in name order.
    pub fn scenes(&self) -> impl Iterator<Item = &Arc<Scene>> {
        self.scenes.values()
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the registry has no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

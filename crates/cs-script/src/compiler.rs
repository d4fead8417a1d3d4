use cs_core::{DialogueLine, Scene, ScriptRegistry, Step, StepAction, StepKind};

use crate::diagnostics::Diagnostic;
use crate::error::{ScriptError, ScriptResult};
use crate::raw::{RawScript, RawStep};

/// Result of compiling one or more raw scripts.
#[derive(Debug, Default)]
pub struct CompileResult {
    /// Every scene that compiled without errors.
    pub registry: ScriptRegistry,
    /// Errors and warnings produced during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning diagnostics only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// The registry, or every error diagnostic if there were any.
    pub fn into_registry(self) -> ScriptResult<ScriptRegistry> {
        if self.has_errors() {
            let errors = self.diagnostics.into_iter().filter(Diagnostic::is_error).collect();
            return Err(ScriptError::Invalid(errors));
        }
        Ok(self.registry)
    }
}

/// Accumulates scenes from several scripts into one registry.
///
/// Scenes with errors are reported and left out; the rest are registered.
#[derive(Debug, Default)]
pub struct Compiler {
    result: CompileResult,
}

impl Compiler {
    /// Create an empty compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every scene of `script`. `file` labels its diagnostics.
    pub fn add_script(&mut self, script: &RawScript, file: Option<&str>) {
        for (name, steps) in &script.scenes {
            self.add_scene(name, steps, file);
        }
    }

    /// Report a problem that is not tied to a scene.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.result.diagnostics.push(diagnostic);
    }

    /// Finish compilation.
    pub fn finish(self) -> CompileResult {
        self.result
    }

    fn add_scene(&mut self, name: &str, raw_steps: &[RawStep], file: Option<&str>) {
        let mut steps = Vec::with_capacity(raw_steps.len());
        let mut failed = false;

        for (index, raw) in raw_steps.iter().enumerate() {
            match compile_step(name, index, raw) {
                Ok(step) => {
                    if let Some(warning) = lint_step(name, index, &step) {
                        self.push_diagnostic(warning.with_file(file));
                    }
                    steps.push(step);
                }
                Err(e) => {
                    self.push_diagnostic(Diagnostic::error(e.to_string()).with_file(file));
                    failed = true;
                }
            }
        }
        if failed {
            return;
        }

        let scene = match Scene::new(name, steps) {
            Ok(scene) => scene,
            Err(e) => {
                self.push_diagnostic(Diagnostic::error(e.to_string()).with_file(file));
                return;
            }
        };
        if let Err(e) = self.result.registry.insert(scene) {
            self.push_diagnostic(Diagnostic::error(e.to_string()).with_file(file));
        }
    }
}

/// Compile all scenes of a single script.
pub fn compile(script: &RawScript) -> CompileResult {
    let mut compiler = Compiler::new();
    compiler.add_script(script, None);
    compiler.finish()
}

/// Turn one raw step into a model step.
pub fn compile_step(scene: &str, index: usize, raw: &RawStep) -> ScriptResult<Step> {
    let missing = |field: &'static str| ScriptError::MissingField {
        scene: scene.to_string(),
        index,
        field,
    };

    let kind = StepKind::from_tag(&raw.tag).ok_or_else(|| ScriptError::UnhandledStepVariant {
        scene: scene.to_string(),
        index,
        tag: raw.tag.clone(),
    })?;

    let action = match kind {
        StepKind::Dialogue => {
            let speaker = raw.speaker.clone().ok_or_else(|| missing("speaker"))?;
            let text = raw.text.clone().ok_or_else(|| missing("text"))?;
            StepAction::Dialogue(DialogueLine::new(
                speaker,
                text,
                raw.align.unwrap_or_default(),
            ))
        }
        StepKind::Delay => StepAction::Delay {
            duration_ms: raw.duration.ok_or_else(|| missing("duration"))?,
        },
        StepKind::SetValue => StepAction::SetValue {
            values: raw.values.clone().ok_or_else(|| missing("values"))?,
        },
        StepKind::Reset => StepAction::Reset,
        StepKind::Complete => StepAction::Complete,
    };

    Ok(Step::new(action)
        .with_auto_advance(raw.auto_advance)
        .with_skippable(raw.skippable))
}

fn lint_step(scene: &str, index: usize, step: &Step) -> Option<Diagnostic> {
    let message = match &step.action {
        StepAction::Dialogue(line) if line.text.is_empty() => "dialogue text is empty",
        StepAction::Delay { duration_ms: 0 } => "delay has zero duration",
        StepAction::SetValue { values } if values.is_empty() => "SET_VALUE sets no variables",
        _ => return None,
    };
    Some(Diagnostic::warning(format!(
        "scene \"{scene}\" step {index}: {message}"
    )))
}

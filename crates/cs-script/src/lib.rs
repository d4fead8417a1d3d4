//! Declarative JSON script format for crtscene.
//!
//! A script maps scene names to step lists. Loading goes through three
//! stages: [`raw`] parses JSON into loosely-typed steps, [`compiler`] turns
//! them into validated [`Scene`](cs_core::Scene)s while collecting
//! [`Diagnostic`]s, and the result is a [`ScriptRegistry`].

/// Raw-step compilation and scene validation.
pub mod compiler;
/// Compiler diagnostics.
pub mod diagnostics;
/// Script loading errors.
pub mod error;
/// The unvalidated on-disk schema.
pub mod raw;

use std::path::Path;

use cs_core::ScriptRegistry;

pub use compiler::{CompileResult, Compiler};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{ScriptError, ScriptResult};
pub use raw::{RawScript, RawStep};

/// The built-in scenes: `init`, `education`, `workHistory` and `contact`.
pub const BUILTIN_SCRIPT: &str = include_str!("../scenes/cv.json");

/// Compile a script from JSON text.
pub fn compile_str(source: &str) -> ScriptResult<CompileResult> {
    let raw = RawScript::from_json(source)?;
    Ok(compiler::compile(&raw))
}

/// Compile a single script file.
pub fn compile_file(path: &Path) -> ScriptResult<CompileResult> {
    let source = read(path)?;
    let raw = RawScript::from_json(&source)?;
    let mut compiler = Compiler::new();
    compiler.add_script(&raw, file_label(path).as_deref());
    Ok(compiler.finish())
}

/// Compile every `.json` file in a directory into a single registry.
///
/// Files are read in sorted order so duplicate reports are deterministic. A
/// file that is not valid JSON is reported as an error diagnostic and the
/// remaining files are still compiled.
pub fn compile_dir(dir: &Path) -> ScriptResult<CompileResult> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|source| ScriptError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();

    // Sort for deterministic ordering
    entries.sort();

    let mut compiler = Compiler::new();
    if entries.is_empty() {
        compiler.push_diagnostic(Diagnostic::error(format!(
            "no .json files found in {}",
            dir.display()
        )));
    }

    for path in entries {
        let source = read(&path)?;
        let label = file_label(&path);
        match RawScript::from_json(&source) {
            Ok(raw) => compiler.add_script(&raw, label.as_deref()),
            Err(e) => compiler.push_diagnostic(
                Diagnostic::error(format!("invalid script: {e}")).with_file(label.as_deref()),
            ),
        }
    }

    Ok(compiler.finish())
}

/// Load a registry from JSON text, failing on any error diagnostic.
pub fn load_str(source: &str) -> ScriptResult<ScriptRegistry> {
    compile_str(source)?.into_registry()
}

/// Load a registry from a file or a directory of `.json` files.
pub fn load_path(path: &Path) -> ScriptResult<ScriptRegistry> {
    compile_path(path)?.into_registry()
}

/// Compile a file or a directory of `.json` files.
pub fn compile_path(path: &Path) -> ScriptResult<CompileResult> {
    if path.is_dir() {
        compile_dir(path)
    } else {
        compile_file(path)
    }
}

/// Compile the built-in scenes.
pub fn compile_builtin() -> ScriptResult<CompileResult> {
    compile_str(BUILTIN_SCRIPT)
}

/// The built-in scene registry.
pub fn builtin() -> ScriptResult<ScriptRegistry> {
    load_str(BUILTIN_SCRIPT)
}

fn read(path: &Path) -> ScriptResult<String> {
    std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_label(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{DisplayKey, StepAction};

    #[test]
    fn builtin_has_cv_scenes() {
        let result = compile_builtin().unwrap();
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let names: Vec<_> = result.registry.names().collect();
        assert_eq!(names, vec!["contact", "education", "init", "workHistory"]);
    }

    #[test]
    fn builtin_init_boots_the_monitor() {
        let registry = builtin().unwrap();
        let init = registry.get_scene("init").unwrap();
        let sets: Vec<_> = init
            .steps()
            .iter()
            .filter_map(|s| match &s.action {
                StepAction::SetValue { values } => Some(values.keys().cloned().collect::<Vec<_>>()),
                _ => None,
            })
            .flatten()
            .collect();
        assert!(sets.contains(&DisplayKey::MonitorOn.as_str().to_string()));
        assert!(sets.contains(&DisplayKey::CvContent.as_str().to_string()));
        assert!(init.steps().last().is_some_and(|s| s.is_complete()));
    }

    #[test]
    fn load_str_rejects_unknown_tag() {
        let err = load_str(r#"{"scenes": {"odd": [{"type": "JUMP"}, {"type": "COMPLETE"}]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unhandled step type \"JUMP\""));
    }

    #[test]
    fn load_str_rejects_bad_json() {
        assert!(matches!(load_str("{"), Err(ScriptError::Json(_))));
    }

    #[test]
    fn compile_dir_reads_sorted_json_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"scenes": {"greet": [{"type": "COMPLETE"}]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"scenes": {"greet": [{"type": "COMPLETE"}], "bye": [{"type": "COMPLETE"}]}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = compile_dir(dir.path()).unwrap();
        let messages: Vec<_> = result.errors().map(ToString::to_string).collect();
        insta::assert_snapshot!(messages.join("\n"), @r#"error: b.json: scene already exists: "greet""#);
        assert_eq!(result.registry.len(), 2);
    }

    #[test]
    fn compile_dir_without_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let result = compile_dir(dir.path()).unwrap();
        assert!(result.has_errors());
    }

    #[test]
    fn load_path_accepts_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greet.json");
        std::fs::write(
            &path,
            r#"{"scenes": {"greet": [{"type": "DIALOGUE", "speaker": "ENGINEER", "text": "hi"}, {"type": "COMPLETE"}]}}"#,
        )
        .unwrap();
        let registry = load_path(&path).unwrap();
        assert_eq!(registry.get_scene("greet").unwrap().dialogue_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }
}

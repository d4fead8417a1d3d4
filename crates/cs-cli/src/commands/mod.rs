pub mod check;
pub mod list;
pub mod play;
pub mod show;
pub mod tui;

use std::path::Path;

use cs_core::ScriptRegistry;
use cs_script::CompileResult;

/// Compile `scripts` (or the built-in content) and print diagnostics.
fn compile(scripts: Option<&Path>) -> Result<CompileResult, String> {
    let result = match scripts {
        Some(path) => cs_script::compile_path(path),
        None => cs_script::compile_builtin(),
    }
    .map_err(|e| e.to_string())?;
    print_diagnostics(&result);
    Ok(result)
}

/// Compile and return the registry if there are no errors.
fn load_registry(scripts: Option<&Path>) -> Result<ScriptRegistry, String> {
    let result = compile(scripts)?;
    if result.has_errors() {
        Err("compilation failed with errors".into())
    } else {
        Ok(result.registry)
    }
}

/// A current-thread runtime for the commands that play scenes.
fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))
}

/// Print diagnostics and a summary line to stderr.
fn print_diagnostics(result: &CompileResult) {
    if result.diagnostics.is_empty() {
        return;
    }

    for diagnostic in &result.diagnostics {
        eprintln!("{diagnostic}");
    }

    let errors = result.errors().count();
    let warnings = result.warnings().count();

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}

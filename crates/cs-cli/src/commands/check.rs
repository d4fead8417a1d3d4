use std::path::Path;

pub fn run(scripts: Option<&Path>) -> Result<(), String> {
    let result = super::compile(scripts)?;
    if result.has_errors() {
        return Err("compilation failed with errors".into());
    }

    let registry = &result.registry;
    let steps: usize = registry.scenes().map(|s| s.len()).sum();
    let lines: usize = registry.scenes().map(|s| s.dialogue_count()).sum();

    println!("  All checks passed.");
    println!(
        "  {} scenes, {} steps, {} dialogue lines",
        registry.len(),
        steps,
        lines
    );

    Ok(())
}

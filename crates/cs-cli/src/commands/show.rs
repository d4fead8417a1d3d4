use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use cs_core::{Step, StepAction};

pub fn run(scripts: Option<&Path>, name: &str, json: bool) -> Result<(), String> {
    let registry = super::load_registry(scripts)?;
    let scene = registry.get_scene(name).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&*scene).map_err(|e| format!("JSON error: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} [{}]",
        scene.name().bold(),
        format!("{} steps", scene.len()).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Type", "Flags", "Payload"]);

    for (index, step) in scene.steps().iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            step.kind().to_string(),
            flags(step),
            payload(step),
        ]);
    }

    println!("{table}");

    Ok(())
}

fn flags(step: &Step) -> String {
    let mut flags = Vec::new();
    if step.auto_advance {
        flags.push("auto");
    }
    if step.skippable {
        flags.push("skip");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(" ")
    }
}

fn payload(step: &Step) -> String {
    match &step.action {
        StepAction::Dialogue(line) => {
            let text = if line.text.chars().count() > 60 {
                let head: String = line.text.chars().take(57).collect();
                format!("{head}...")
            } else {
                line.text.clone()
            };
            format!("{} ({}): {text}", line.speaker, line.alignment)
        }
        StepAction::Delay { duration_ms } => format!("{duration_ms} ms"),
        StepAction::SetValue { values } => values
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", "),
        StepAction::Reset | StepAction::Complete => "-".to_string(),
    }
}

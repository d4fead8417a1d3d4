use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(scripts: Option<&Path>) -> Result<(), String> {
    let registry = super::load_registry(scripts)?;

    if registry.is_empty() {
        println!("  No scenes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Steps", "Dialogue", "Scripted delay"]);

    for scene in registry.scenes() {
        let delay = scene.scripted_delay();
        let delay = if delay.is_zero() {
            "-".to_string()
        } else {
            format!("{:.1}s", delay.as_secs_f64())
        };
        table.add_row(vec![
            scene.name().to_string(),
            scene.len().to_string(),
            scene.dialogue_count().to_string(),
            delay,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} scene{}",
        registry.len(),
        if registry.len() == 1 { "" } else { "s" }
    );

    Ok(())
}

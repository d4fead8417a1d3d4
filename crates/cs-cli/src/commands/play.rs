use std::path::Path;

use colored::Colorize;
use cs_engine::{EngineConfig, HeadlessPlayer};

pub fn run(scripts: Option<&Path>, scene: &str, instant: bool) -> Result<(), String> {
    let registry = super::load_registry(scripts)?;
    let config = if instant {
        EngineConfig::instant()
    } else {
        EngineConfig::default()
    };

    let mut player = HeadlessPlayer::new(registry, &config);
    let report = super::runtime()?
        .block_on(player.play(scene, |bubble| {
            println!("{}: {}", bubble.line.speaker, bubble.visible_text());
        }))
        .map_err(|e| e.to_string())?;

    println!();
    println!(
        "  {}",
        format!(
            "{} lines, {} proceeds, {:.1}s",
            report.lines,
            report.proceeds,
            report.elapsed.as_secs_f64()
        )
        .dimmed()
    );

    Ok(())
}

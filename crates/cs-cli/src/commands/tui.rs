use std::path::Path;

pub fn run(scripts: Option<&Path>, scene: &str, log_file: Option<&Path>) -> Result<(), String> {
    if let Some(path) = log_file {
        cs_tui::logging::init_file_logging(path)?;
    }
    let registry = super::load_registry(scripts)?;
    super::runtime()?.block_on(cs_tui::terminal::run(registry, scene))
}

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use lomb_panda::app::run_viewer;
use lomb_panda::batch::BatchDriver;
use lomb_panda::config::Config;
use lomb_panda::render::PngRenderer;
use lomb_panda::state::AppState;

/// Usage: `lomb-panda [config.json]`
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::resolve(config_path.as_deref()).context("loading configuration")?;

    let renderer = PngRenderer::new(config.image_width, config.image_height);
    let driver = BatchDriver::new(&config, &renderer);

    // Results are only kept around when they are going to be shown.
    let mut viewer = config.display.then(|| AppState::new(config.clone()));

    let report = driver
        .run_with(|path, analysis| {
            if let Some(state) = viewer.as_mut() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                state.add_entry(name, analysis);
            }
        })
        .context("running batch")?;

    if let Some(mut state) = viewer {
        state.record_failures(&report);
        run_viewer(state).map_err(|e| anyhow!("viewer failed: {e}"))?;
    }

    Ok(())
}

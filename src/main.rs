use anyhow::Result;
use clap::Parser;
use log::info;

use render_loop::app::{run_headless, run_windowed};
use render_loop::cli::Cli;
use render_loop::config::Config;
use render_loop::demo::PulseEngine;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::resolve(&cli)?;
    let engine = PulseEngine::new(&config);

    if config.headless {
        run_headless(&config, engine)?;
        return Ok(());
    }

    info!("Render Loop - Space pauses, arrows/wheel change speed, Escape to quit");
    run_windowed(config, engine)
}

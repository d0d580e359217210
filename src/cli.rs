// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "render-loop")]
#[command(about = "Animated render loop on a winit window", long_about = None)]
pub struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Render on expose/resize only instead of continuously
    #[arg(long = "no-animate", default_value = "false")]
    pub no_animate: bool,

    /// Stop after this many frames
    #[arg(long = "max-frames")]
    pub max_frames: Option<u64>,

    /// Run the loop without a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Disable FPS output
    #[arg(long, default_value = "false")]
    pub quiet: bool,
}

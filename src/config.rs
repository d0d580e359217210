use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Run configuration; JSON file values with CLI overrides on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub animate: bool,
    pub max_frames: Option<u64>,
    pub headless: bool,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Render Loop".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            animate: true,
            max_frames: None,
            headless: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config file (if any) plus CLI overrides, validated
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overlay command-line flags
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if cli.no_animate {
            self.animate = false;
        }
        if cli.max_frames.is_some() {
            self.max_frames = cli.max_frames;
        }
        self.headless |= cli.headless;
        self.quiet |= cli.quiet;
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.headless && self.animate && self.max_frames.is_none() {
            bail!("headless animation needs --max-frames to terminate");
        }
        Ok(())
    }
}

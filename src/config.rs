use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::geometry::{deserialize_color, Rgba};

pub const DEFAULT_SHUFFLE_STEPS: usize = 1000;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_CELLS_PER_SECOND: u32 = 60;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub shuffle_steps: usize,
    pub fps: u32,
    /// Slide animation speed.
    pub cells_per_second: u32,
    /// Gap between elements on the puzzle screen.
    pub border: i32,
    /// Gap between elements on the menu screen.
    pub menu_border: i32,
    pub palette: Palette,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Palette {
    #[serde(deserialize_with = "deserialize_color")]
    pub background: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub tile: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub tile_done: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub label: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub label_done: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub stopwatch: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub button: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub button_down: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub menu_button: Rgba,
    #[serde(deserialize_with = "deserialize_color")]
    pub menu_label: Rgba,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shuffle_steps: DEFAULT_SHUFFLE_STEPS,
            fps: DEFAULT_FPS,
            cells_per_second: DEFAULT_CELLS_PER_SECOND,
            border: 1,
            menu_border: 1,
            palette: Palette::default(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgba::BLACK,
            tile: Rgba::rgb(0, 20, 50),
            tile_done: Rgba::rgb(50, 255, 100), // Green
            label: Rgba::rgb(255, 40, 10),      // LED red
            label_done: Rgba::WHITE,
            stopwatch: Rgba::rgb(160, 102, 198), // Purple
            button: Rgba::rgb(0, 20, 50),
            button_down: Rgba::rgb(50, 255, 100),
            menu_button: Rgba::BLACK,
            menu_label: Rgba::WHITE,
        }
    }
}

impl Config {
    /// Milliseconds per frame at the configured rate.
    pub fn frame_budget_ms(&self) -> u64 {
        1000 / self.fps.max(1) as u64
    }

    /// Milliseconds the slide animation spends on each cell.
    pub fn ms_per_cell(&self) -> f64 {
        1000.0 / self.cells_per_second.max(1) as f64
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    dirs::config_dir().map(|dir| dir.join(pgm).join("config.toml"))
}

pub fn parse(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path`, or the default location when `None`. A missing default file
/// yields the defaults; a missing explicit file is an error.
pub fn read(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match get_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&config_path)?;
    let config = parse(&content, &config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

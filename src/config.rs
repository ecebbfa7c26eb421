//! Configuration file handling for crosshair-cfg.
//!
//! Loads configuration from `~/.config/crosshair-cfg/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::names::{self, DEFAULT_PREFIX};
use crate::preview::{CharSet, PreviewOptions, DEFAULT_PREVIEW_COLUMNS, MAX_PREVIEW_COLUMNS};
use crate::render::{Canvas, MAX_CANVAS_EDGE, PREVIEW_CANVAS_EDGE};

/// Written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# crosshair-cfg configuration

[output]
# Directory for generated .cfg files (default: current directory)
# dir = "~/cs2/cfg"
# Base for generated names
prefix = "crosshair_"

[store]
# Directory for the issued-name store (default: platform data dir)
# dir = "~/.local/share/crosshair-cfg"

[preview]
# Print a terminal preview after converting
enabled = true
# Character set: standard, blocks, minimal, braille
charset = "standard"
# Preview width in terminal columns
width = 44
# Invert brightness (for light themes)
invert = false
# Canvas edge in pixels
canvas = 220.0
"#;

/// Configuration file structure for crosshair-cfg.
/// Loaded from ~/.config/crosshair-cfg/config.toml (or custom path via --config).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub charset: CharSet,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub canvas: Option<f64>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            charset: CharSet::default(),
            width: None,
            invert: false,
            canvas: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Like [`Config::load`], but a broken file at the default location
    /// only logs a warning. An explicit path must load.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(Some(path)),
            None => Ok(Self::load(None).unwrap_or_else(|e| {
                log::warn!("{}; using defaults", e);
                Config::default()
            })),
        }
    }

    /// Directory generated .cfg files go to.
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Base for allocated names; empty falls back to the default.
    pub fn prefix(&self) -> &str {
        match self.output.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => DEFAULT_PREFIX,
        }
    }

    /// Directory of the issued-name store.
    pub fn store_dir(&self) -> PathBuf {
        self.store.dir.clone().unwrap_or_else(names::default_dir)
    }

    /// Square canvas; non-positive or non-finite edges fall back to the default
    /// and larger ones are capped at [`MAX_CANVAS_EDGE`].
    pub fn canvas(&self) -> Canvas {
        match self.preview.canvas {
            Some(edge) if edge.is_finite() && edge > 0.0 => {
                let edge = edge.min(MAX_CANVAS_EDGE);
                Canvas::new(edge, edge)
            }
            _ => Canvas::new(PREVIEW_CANVAS_EDGE, PREVIEW_CANVAS_EDGE),
        }
    }

    /// Preview settings, with `width` capped at [`MAX_PREVIEW_COLUMNS`].
    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            columns: self
                .preview
                .width
                .filter(|&w| w > 0)
                .map_or(DEFAULT_PREVIEW_COLUMNS, |w| w.min(MAX_PREVIEW_COLUMNS)),
            charset: self.preview.charset,
            invert: self.preview.invert,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("crosshair-cfg").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/crosshair-cfg/config.toml")
        })
}

//! Configuration loading
//!
//! Settings are stored as JSON in the user's config directory
//! (`<config_dir>/stagehand/config.json`). Every field has a default, so a
//! missing file or a partial file is fine.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::capture::PollPolicy;
use crate::constants::{assets, capture, notify, visibility};
use crate::error::{Result, StageError};

const CONFIG_DIR: &str = "stagehand";
const CONFIG_FILE: &str = "config.json";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the asset library holding per-brand model folders
    pub asset_root: PathBuf,
    /// Directory holding camera, light and limbo templates
    pub templates_dir: PathBuf,
    /// URI prefix of remotely addressed assets
    pub remote_prefix: String,
    /// Infrastructure scopes kept visible while isolating a model
    pub keep_scopes: Vec<String>,
    /// Two-letter model code prefix -> brand folder name
    pub brands: BTreeMap<String, String>,
    pub notifications: NotificationConfig,
    pub capture: CaptureConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            templates_dir: PathBuf::from("templates"),
            remote_prefix: assets::DEFAULT_REMOTE_PREFIX.to_string(),
            keep_scopes: visibility::DEFAULT_KEEP_SCOPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            brands: BTreeMap::new(),
            notifications: NotificationConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

/// How long notifications stay on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub info_secs: u64,
    pub warning_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            info_secs: notify::DEFAULT_INFO_SECS,
            warning_secs: notify::DEFAULT_WARNING_SECS,
        }
    }
}

/// Viewport capture settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// `<width>x<height>`
    pub resolution: String,
    pub start_frame: i32,
    pub end_frame: i32,
    pub extension: String,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: capture::DEFAULT_RESOLUTION.to_string(),
            start_frame: capture::DEFAULT_START_FRAME,
            end_frame: capture::DEFAULT_END_FRAME,
            extension: capture::DEFAULT_EXTENSION.to_string(),
            poll_interval_ms: capture::DEFAULT_POLL_INTERVAL_MS,
            timeout_secs: capture::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CaptureConfig {
    /// Parse `resolution` into (width, height)
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        parse_resolution(&self.resolution)
    }

    pub fn poll_policy(&self) -> Result<PollPolicy> {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

/// Parse a `<width>x<height>` resolution string
pub fn parse_resolution(resolution: &str) -> Result<(u32, u32)> {
    let invalid = || StageError::Config(format!("invalid resolution '{}'", resolution));

    let (width, height) = resolution.split_once('x').ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit file, or from the default location when it
    /// exists, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.capture.dimensions()?;

        if self.capture.start_frame > self.capture.end_frame {
            return Err(StageError::Config(format!(
                "start frame {} is after end frame {}",
                self.capture.start_frame, self.capture.end_frame
            )));
        }
        self.capture.poll_policy()?;
        if self.capture.extension.is_empty() {
            return Err(StageError::Config("capture extension is empty".to_string()));
        }
        if self.remote_prefix.is_empty() {
            return Err(StageError::Config("remote prefix is empty".to_string()));
        }
        Ok(())
    }

    /// Brand folder for a model code, looked up by its first two characters.
    /// Spaces in brand names become underscores.
    pub fn brand_for_model(&self, model: &str) -> Option<String> {
        let key: String = model.chars().take(2).collect();
        self.brands.get(&key).map(|brand| brand.replace(' ', "_"))
    }
}

//! Configuration types for Dashgrid.
//!
//! This module contains the configuration structures and the loader that reads
//! them from disk. The configuration file supports JSONC format (JSON with
//! comments).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::grid::{
    LayoutError, WidgetDefinition, WidgetPosition, default_catalog, default_layout,
    layout_for_catalog, validate_layout,
};

// ============================================================================
// Grid
// ============================================================================

/// Pixel metrics of the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Padding around the grid in pixels.
    /// Default: 16
    pub padding: f64,

    /// Gap between columns and between rows in pixels.
    /// Default: 12
    pub gap: f64,

    /// Side length of a small (1×1) cell in pixels.
    /// Default: 160
    pub cell_size: f64,

    /// Horizontal nudge applied when drawing widgets.
    /// Small widgets shift left by this amount, wider ones right.
    /// Default: 4
    pub centering_offset: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            padding: 16.0,
            gap: 12.0,
            cell_size: 160.0,
            centering_offset: 4.0,
        }
    }
}

// ============================================================================
// Drag
// ============================================================================

/// Drag gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DragConfig {
    /// Minimum time between two live rearrangement previews, in milliseconds.
    /// Default: 100
    pub live_interval_ms: u64,

    /// Scale applied to the widget being dragged.
    /// Default: 1.05
    pub drag_scale: f64,

    /// Scale applied to every widget while in edit mode.
    /// Default: 0.95
    pub edit_scale: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            live_interval_ms: 100,
            drag_scale: 1.05,
            edit_scale: 0.95,
        }
    }
}

impl DragConfig {
    /// The live preview interval as a `Duration`.
    #[must_use]
    pub const fn live_interval(&self) -> Duration { Duration::from_millis(self.live_interval_ms) }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure for Dashgrid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DashgridConfig {
    /// JSON schema reference, ignored by the loader.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Grid pixel metrics.
    pub grid: GridConfig,

    /// Drag gesture tuning.
    pub drag: DragConfig,

    /// Widget catalog.
    pub widgets: Vec<WidgetDefinition>,

    /// Persisted layout. When empty, widgets are placed in catalog order.
    pub layout: Vec<WidgetPosition>,
}

impl Default for DashgridConfig {
    fn default() -> Self {
        Self {
            schema: None,
            grid: GridConfig::default(),
            drag: DragConfig::default(),
            widgets: default_catalog(),
            layout: default_layout(),
        }
    }
}

impl DashgridConfig {
    /// Checks the configuration and fills in a layout for an empty one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLayout` if the layout breaks a grid invariant,
    /// and `ConfigError::InvalidValue` for metrics that cannot describe a grid or
    /// for layout entries missing from the catalog.
    pub fn normalize(mut self) -> Result<Self, ConfigError> {
        let grid = &self.grid;
        if grid.cell_size <= 0.0 || grid.gap < 0.0 || grid.padding < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "grid metrics must be non-negative with a positive cell size \
                 (padding {}, gap {}, cellSize {})",
                grid.padding, grid.gap, grid.cell_size
            )));
        }

        if self.layout.is_empty() && !self.widgets.is_empty() {
            tracing::debug!("config: no layout configured, placing widgets in catalog order");
            self.layout = layout_for_catalog(&self.widgets);
        }

        validate_layout(&self.layout)?;

        if !self.widgets.is_empty()
            && let Some(unknown) = self
                .layout
                .iter()
                .find(|pos| !self.widgets.iter().any(|def| def.id == pos.id))
        {
            return Err(ConfigError::InvalidValue(format!(
                "layout references widget '{}' that is not in the catalog",
                unknown.id
            )));
        }

        Ok(self)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/dashgrid/config.jsonc \
         or ~/.dashgrid.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configured layout breaks a grid invariant.
    #[error("Invalid layout in configuration file: {0}")]
    InvalidLayout(#[from] LayoutError),

    /// A configured value is out of range.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration file names in order of priority.
const CONFIG_FILE_NAMES: [&str; 2] = ["config.jsonc", "config.json"];

/// Legacy configuration file names in the home directory.
const LEGACY_CONFIG_FILE_NAMES: [&str; 2] = [".dashgrid.jsonc", ".dashgrid.json"];

/// Application directory name under the config roots.
const APP_DIR: &str = "dashgrid";

/// Returns the candidate configuration paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/dashgrid/` when the variable is set
/// 2. `~/.config/dashgrid/`
/// 3. The platform config directory (`dirs::config_dir`)
/// 4. `~/.dashgrid.jsonc` and `~/.dashgrid.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    fn push_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME is often ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(&PathBuf::from(xdg_config).join(APP_DIR), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(&home.join(".config").join(APP_DIR), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(&config_dir.join(APP_DIR), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the
/// expected locations, or any error from [`load_config_from_path`].
pub fn load_config() -> Result<(DashgridConfig, PathBuf), ConfigError> {
    let path = config_paths().into_iter().find(|path| path.is_file()).ok_or(ConfigError::NotFound)?;
    load_config_from_path(&path)
}

/// Loads the configuration from a specific file path.
///
/// A leading `~` is expanded to the home directory. Comments are stripped
/// before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read, `ConfigError::ParseError` for
/// invalid JSON, and the `normalize` errors for invalid contents.
pub fn load_config_from_path(path: &Path) -> Result<(DashgridConfig, PathBuf), ConfigError> {
    let path = expand_path(path);
    if !path.is_file() {
        return Err(ConfigError::NotFound);
    }

    let file = File::open(&path)?;
    let config = parse_config(file)?;
    tracing::debug!(path = %path.display(), "config: loaded configuration");
    Ok((config, path))
}

/// Parses and normalizes a configuration from a JSONC reader.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` for invalid JSON and the `normalize`
/// errors for invalid contents.
pub fn parse_config(reader: impl std::io::Read) -> Result<DashgridConfig, ConfigError> {
    let stripped = json_comments::StripComments::new(reader);
    let config: DashgridConfig = serde_json::from_reader(stripped)?;
    config.normalize()
}

/// Expands a leading `~` in a path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

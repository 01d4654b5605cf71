//! Configuration module for Dashgrid.
//!
//! This module provides configuration types and loading functionality.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    ConfigError, DashgridConfig, DragConfig, GridConfig, config_paths, expand_path,
    load_config as load_config_default, load_config_from_path, parse_config,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<DashgridConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `init()` or `get_config()` to take effect.
///
/// # Returns
///
/// `true` if the path was set successfully, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool {
    CUSTOM_CONFIG_PATH.set(expand_path(&path)).is_ok()
}

/// Loads the configuration from disk.
///
/// A missing file yields the defaults silently; any other failure is logged
/// and also falls back to the defaults.
fn load_or_default() -> DashgridConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            if let Some(path) = CUSTOM_CONFIG_PATH.get() {
                tracing::warn!(path = %path.display(), "configuration file not found, using defaults");
            } else {
                tracing::debug!("no configuration file found, using defaults");
            }
            DashgridConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            DashgridConfig::default()
        }
    }
}

/// Initializes and returns the global configuration instance.
///
/// This function is idempotent - calling it multiple times will return
/// the same configuration instance.
pub fn init() -> &'static DashgridConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the global configuration instance, initializing it if necessary.
pub fn get_config() -> &'static DashgridConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

//! Configuration loading and data folder resolution
//!
//! Resolution priority used by every licscan service:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by each binary's argument parser; this module
//! provides tiers 3 and 4.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default port for the licscan web UI
pub const DEFAULT_UI_PORT: u16 = 5780;

/// Default base URL of the authentication service
pub const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:8000";

/// Default base URL of the analysis (report generation) service
pub const DEFAULT_ANALYSIS_URL: &str = "http://127.0.0.1:8001";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Contents of `licscan-ui.toml`
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub auth_url: Option<String>,
    pub analysis_url: Option<String>,
    pub data_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled defaults for the current platform (tier 4)
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_folder: PathBuf,
    pub port: u16,
    pub auth_url: String,
    pub analysis_url: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            data_folder: default_data_folder(),
            port: DEFAULT_UI_PORT,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            log_level: default_log_level(),
        }
    }
}

/// OS-dependent default data folder
///
/// - Linux: `~/.local/share/licscan`
/// - macOS: `~/Library/Application Support/licscan`
/// - Windows: `%LOCALAPPDATA%\licscan`
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("licscan"))
        .unwrap_or_else(|| PathBuf::from("./licscan_data"))
}

/// Default config file location for a module, e.g. `~/.config/licscan/licscan-ui.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("licscan").join(format!("{}.toml", module_name)))
}

/// Load a TOML config file
///
/// A missing file is not an error: the caller falls back to defaults.
/// A file that exists but cannot be parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Create the data folder if it does not exist yet
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created data folder: {}", path.display());
    }
    Ok(())
}

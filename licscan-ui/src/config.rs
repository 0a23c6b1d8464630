//! licscan-ui configuration
//!
//! Command-line flags and environment variables come from clap; anything
//! they leave unset falls through to the TOML file and then to the
//! compiled defaults.

use clap::Parser;
use licscan_common::config::{CompiledDefaults, TomlConfig};
use std::path::PathBuf;

/// Command-line arguments for licscan-ui
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "licscan-ui")]
#[command(about = "Web UI for dependency-license analysis")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "LICSCAN_UI_PORT")]
    pub port: Option<u16>,

    /// Base URL of the authentication service
    #[arg(long, env = "LICSCAN_AUTH_URL")]
    pub auth_url: Option<String>,

    /// Base URL of the analysis service
    #[arg(long, env = "LICSCAN_ANALYSIS_URL")]
    pub analysis_url: Option<String>,

    /// Folder holding the persisted session token
    #[arg(short, long, env = "LICSCAN_DATA_FOLDER")]
    pub data_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long, env = "LICSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub port: u16,
    pub auth_url: String,
    pub analysis_url: String,
    pub data_folder: PathBuf,
    /// Used only when RUST_LOG is not set
    pub log_level: String,
}

impl UiConfig {
    /// Merge the tiers, highest priority first
    pub fn resolve(args: &Args, toml: &TomlConfig, defaults: &CompiledDefaults) -> Self {
        Self {
            port: args.port.or(toml.port).unwrap_or(defaults.port),
            auth_url: args
                .auth_url
                .clone()
                .or_else(|| toml.auth_url.clone())
                .unwrap_or_else(|| defaults.auth_url.clone()),
            analysis_url: args
                .analysis_url
                .clone()
                .or_else(|| toml.analysis_url.clone())
                .unwrap_or_else(|| defaults.analysis_url.clone()),
            data_folder: args
                .data_folder
                .clone()
                .or_else(|| toml.data_folder.clone())
                .unwrap_or_else(|| defaults.data_folder.clone()),
            log_level: toml.logging.level.clone(),
        }
    }

    /// Filter directive used when RUST_LOG is absent
    pub fn log_directive(&self) -> String {
        format!("licscan_ui={level},tower_http={level}", level = self.log_level)
    }
}

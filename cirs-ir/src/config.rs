//! Service configuration for cirs-ir
//!
//! Resolution priority per setting:
//! 1. Command-line argument / environment variable (via clap)
//! 2. TOML configuration file
//! 3. Built-in default
//!
//! Everything is resolved once at startup into an immutable
//! [`ServiceConfig`]; handlers never read the environment.

use cirs_common::config::{self, TomlConfig};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5741";
const DEFAULT_IDENTITY_URL: &str = "http://127.0.0.1:5751";
const DEFAULT_VISION_URL: &str = "http://127.0.0.1:5761";
const DEFAULT_SPEECH_URL: &str = "http://127.0.0.1:5762";

/// Command-line / environment overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub identity_url: Option<String>,
    pub vision_url: Option<String>,
    pub speech_url: Option<String>,
}

/// Resolved, immutable service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP bind address
    pub bind_address: String,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Identity provider base URL
    pub identity_url: String,
    /// Object-detection service base URL
    pub vision_url: String,
    /// Speech-to-text service base URL
    pub speech_url: String,
}

impl ServiceConfig {
    /// Resolve the full configuration from overrides, TOML, and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        let toml_config = match config::load_toml_config() {
            Ok(config) => config,
            Err(e) => {
                // Missing config file must not prevent startup
                warn!("No usable TOML config ({}), using defaults", e);
                TomlConfig::default()
            }
        };

        let root_folder = config::resolve_root_folder(
            overrides.root_folder.as_deref(),
            "CIRS_ROOT_FOLDER",
        );
        let database_path = config::database_path(&root_folder);

        let config = Self {
            bind_address: pick(
                overrides.bind_address.clone(),
                toml_config.bind_address.clone(),
                DEFAULT_BIND_ADDRESS,
            ),
            database_path,
            identity_url: pick(
                overrides.identity_url.clone(),
                toml_config.identity_url.clone(),
                DEFAULT_IDENTITY_URL,
            ),
            vision_url: pick(
                overrides.vision_url.clone(),
                toml_config.vision_url.clone(),
                DEFAULT_VISION_URL,
            ),
            speech_url: pick(
                overrides.speech_url.clone(),
                toml_config.speech_url.clone(),
                DEFAULT_SPEECH_URL,
            ),
        };

        info!(
            bind_address = %config.bind_address,
            database = %config.database_path.display(),
            identity_url = %config.identity_url,
            vision_url = %config.vision_url,
            speech_url = %config.speech_url,
            "Configuration resolved"
        );

        config
    }
}

fn pick(override_value: Option<String>, toml_value: Option<String>, default: &str) -> String {
    override_value
        .or(toml_value)
        .unwrap_or_else(|| default.to_string())
}

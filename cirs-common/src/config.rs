//! Configuration loading and root folder resolution
//!
//! Configuration priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes to the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder for service data (database lives here)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP bind address, e.g. "0.0.0.0:5741"
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Base URL of the identity provider (token verification)
    #[serde(default)]
    pub identity_url: Option<String>,

    /// Base URL of the object-detection inference service
    #[serde(default)]
    pub vision_url: Option<String>,

    /// Base URL of the speech-to-text inference service
    #[serde(default)]
    pub speech_url: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve the service root folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`env_var_name`)
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    match load_toml_config() {
        Ok(config) => {
            if let Some(root_folder) = config.root_folder {
                return root_folder;
            }
        }
        Err(e) => {
            // Missing config file must not prevent startup
            warn!("No usable TOML config ({}), falling back to default", e);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Load and parse the TOML config file from the platform config location
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Get the configuration file path for the platform
///
/// Linux tries `~/.config/cirs/config.toml` first, then `/etc/cirs/config.toml`.
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("cirs").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/cirs/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/cirs (or /var/lib/cirs for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("cirs"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/cirs"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/cirs
        dirs::data_dir()
            .map(|d| d.join("cirs"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/cirs"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\cirs
        dirs::data_local_dir()
            .map(|d| d.join("cirs"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\cirs"))
    } else {
        PathBuf::from("./cirs_data")
    }
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Database file path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("cirs.db")
}

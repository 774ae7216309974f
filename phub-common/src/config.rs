//! Configuration loading and data root resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Default HTTP port for the consolidation service
pub const DEFAULT_PORT: u16 = 8080;

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding one sub-directory per scraped property
    pub data_root: PathBuf,
    /// HTTP listen port
    pub port: u16,
}

impl Settings {
    /// Resolve settings following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable (`PHUB_DATA_ROOT` / `PHUB_PORT`)
    /// 3. TOML config file (`phub/config.toml` under the platform config dir)
    /// 4. Compiled default (fallback)
    pub fn resolve(cli_data_root: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let file = load_config_file().ok();

        let data_root = resolve_data_root(cli_data_root, file.as_ref());
        let port = resolve_port(cli_port, file.as_ref())?;

        tracing::debug!(
            data_root = %data_root.display(),
            port = port,
            "Resolved settings"
        );

        Ok(Settings { data_root, port })
    }
}

fn resolve_data_root(cli_arg: Option<&str>, file: Option<&toml::Value>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("PHUB_DATA_ROOT") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(root) = file
        .and_then(|config| config.get("data_root"))
        .and_then(|v| v.as_str())
    {
        return PathBuf::from(root);
    }

    // Priority 4: OS-dependent compiled default
    get_default_data_root()
}

fn resolve_port(cli_arg: Option<u16>, file: Option<&toml::Value>) -> Result<u16> {
    if let Some(port) = cli_arg {
        return Ok(port);
    }

    if let Ok(raw) = std::env::var("PHUB_PORT") {
        return raw
            .parse::<u16>()
            .map_err(|_| Error::Config(format!("Invalid PHUB_PORT value: {}", raw)));
    }

    if let Some(port) = file
        .and_then(|config| config.get("port"))
        .and_then(|v| v.as_integer())
    {
        if !(1..=u16::MAX as i64).contains(&port) {
            return Err(Error::Config(format!("Port out of range: {}", port)));
        }
        return Ok(port as u16);
    }

    Ok(DEFAULT_PORT)
}

/// Load and parse the platform config file, if one exists
fn load_config_file() -> Result<toml::Value> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Get default configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("phub").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    if user_config.exists() {
        return Ok(user_config);
    }

    let system_config = PathBuf::from("/etc/phub/config.toml");
    if cfg!(target_os = "linux") && system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default data root path
fn get_default_data_root() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("phub"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/phub"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("phub"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/phub"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("phub"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\phub"))
    } else {
        PathBuf::from("./phub_data")
    }
}

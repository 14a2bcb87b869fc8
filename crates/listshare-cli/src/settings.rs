use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use listshare_core::config::Config;
use listshare_core::ConfigError;
use tracing::debug;

pub const CONFIG_ENV: &str = "LISTSHARE_CONFIG";
pub const STORE_ENV: &str = "LISTSHARE_STORE";

/// Flag, then `LISTSHARE_CONFIG`, then the platform config directory.
pub fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| app_dir(dirs::config_dir()).join("config.toml"))
}

/// Flag, then `LISTSHARE_STORE`, then `[storage] path`, then the platform
/// data directory.
pub fn store_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| env::var_os(STORE_ENV).map(PathBuf::from))
        .or_else(|| config.storage.path.clone())
        .unwrap_or_else(|| app_dir(dirs::data_dir()).join("store.json"))
}

/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("listshare")
}

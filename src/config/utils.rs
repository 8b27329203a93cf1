/// Configuration utilities - loading and access helpers
use super::schemas::Config;
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Parse a TOML document into a `Config`
pub fn parse_config(contents: &str, path: &str) -> Result<Config, ConfigError> {
    toml::from_str::<Config>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Read a config file; a missing file yields defaults
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let display = path.display().to_string();

    if !path.exists() {
        logger::debug(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", display),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;

    parse_config(&contents, &display)
}

/// Load configuration from a file and initialize the global CONFIG
pub fn load_config_from_path(path: &Path) -> Result<(), ConfigError> {
    let config = read_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Load configuration from the default location
pub fn load_config() -> Result<(), ConfigError> {
    load_config_from_path(&crate::paths::get_config_path())
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when nothing was loaded.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    let config = lock.read();
    f(&config)
}

/// Get a clone of the entire configuration (safe to hold across awaits)
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

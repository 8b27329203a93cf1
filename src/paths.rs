//! Centralized path resolution for swaprelay
//!
//! All file and directory paths go through this module so the CLI, the
//! listing cache and the logger agree on one layout:
//!
//! ```text
//! <base>/
//! ├── data/
//! │ ├── config.toml
//! │ └── listings/
//! │   └── <venue>_<mintA>_<mintB>.json
//! └── logs/
//!   └── swaprelay_*.log
//! ```
//!
//! `<base>` is `$SWAPRELAY_HOME` when set, otherwise the platform data
//! directory (`dirs::data_local_dir()/swaprelay`).

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Environment override for the base directory
pub const HOME_ENV_VAR: &str = "SWAPRELAY_HOME";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
  const APP_DIR: &str = "swaprelay";

  if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
    if !dir.trim().is_empty() {
      return PathBuf::from(dir);
    }
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(format!(".{}", APP_DIR));
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Config file and listing caches live here
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

/// On-disk tier of the venue listing cache
pub fn get_listings_cache_directory() -> PathBuf {
  get_data_directory().join("listings")
}

pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// Create every directory the process writes to
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = [
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
    ("listings", get_listings_cache_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;
    }
  }

  Ok(())
}

mod config;
mod persist;

pub use config::{Config, PersistenceConfig};
pub use persist::{PersistPolicy, SessionStorage, INTRO_KEY, PROGRESS_KEY, STORAGE_VERSION};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `STARFOLIO_DATA_DIR` wins when set. Otherwise `~/.config/starfolio/`,
/// or `~/.config/starfolio-dev/` with `STARFOLIO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STARFOLIO_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STARFOLIO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("starfolio-dev")
            } else {
                base_dir.join("starfolio")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

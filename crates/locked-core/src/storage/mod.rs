mod config;
pub mod database;
mod theme;

pub use config::{Config, HistoryConfig, TimerConfig};
pub use database::Database;
pub use theme::{Theme, THEME_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/locked[-dev]/` based on LOCKED_ENV.
///
/// Set LOCKED_ENV=dev to use development data directory. LOCKED_DATA_DIR
/// overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LOCKED_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LOCKED_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("locked-dev")
            } else {
                base_dir.join("locked")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

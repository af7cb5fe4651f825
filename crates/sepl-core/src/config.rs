//! Persistent configuration for sepl.
//!
//! Stores user settings in `~/.sepl/config.json`, or under `$SEPL_HOME` when
//! that variable is set.
//!
//! # Example
//!
//! ```no_run
//! use sepl_core::config::SeplConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = SeplConfig::load();
//! if !config.close_on_exit {
//!     println!("browser sessions stay open after a run");
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SeplError;

const CONFIG_FILENAME: &str = "config.json";
const HOME_ENV: &str = "SEPL_HOME";

/// Persistent sepl configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeplConfig {
    /// Close the browser session once a script finishes, on success and
    /// on failure.
    pub close_on_exit: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for SeplConfig {
    fn default() -> Self {
        Self { close_on_exit: true, log_filter: None }
    }
}

/// `$SEPL_HOME`, else `~/.sepl`.
pub fn sepl_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sepl")
}

pub fn config_path() -> PathBuf {
    sepl_dir().join(CONFIG_FILENAME)
}

impl SeplConfig {
    /// Load config from [`config_path`].
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to [`config_path`], creating the directory if needed.
    pub fn save(&self) -> Result<(), SeplError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SeplError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

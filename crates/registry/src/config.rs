use std::{env, path::PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "NODEDOC_CONFIG_PATH";

/// Registry section of the nodedoc config file.
///
/// The file may carry other sections (for example `engine`); unknown keys are
/// ignored here.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Location of the node catalog JSON document.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl RegistryConfig {
    /// Loads the config from [`default_config_path`], falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load() -> Self {
        let path = default_config_path();
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(config) = serde_json::from_str::<RegistryConfig>(&content)
        {
            return config.expanded();
        }
        RegistryConfig::default()
    }

    fn expanded(mut self) -> Self {
        self.catalog_path = self
            .catalog_path
            .map(|path| expand_tilde(path.to_string_lossy().as_ref()));
        self
    }
}

/// Get the default path for the nodedoc configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nodedoc")
        .join("config.json")
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

use std::{path::Path, time::Duration};

use nodedoc_registry::default_config_path;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunables for the suggestion engine and its caches.
///
/// Read from the `engine` section of the nodedoc config file; every field is
/// optional there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Age after which a cached operation list is refetched.
    pub operation_cache_ttl_ms: u64,
    /// Suggestion cache size that triggers trimming during cleanup.
    pub suggestion_cache_high_water: usize,
    /// Most recent suggestion entries kept after trimming.
    pub suggestion_cache_retain: usize,
    /// Similarity scores at or below this value are discarded.
    pub min_confidence: f64,
    /// Confidence assigned to pattern-library matches.
    pub pattern_confidence: f64,
    pub default_max_results: usize,
    /// Chance that an operation lookup runs cache cleanup.
    pub operation_cleanup_probability: f64,
    /// Chance that a suggestion lookup runs cache cleanup.
    pub suggestion_cleanup_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operation_cache_ttl_ms: 5 * 60 * 1000,
            suggestion_cache_high_water: 100,
            suggestion_cache_retain: 50,
            min_confidence: 0.3,
            pattern_confidence: 0.85,
            default_max_results: 5,
            operation_cleanup_probability: 0.05,
            suggestion_cleanup_probability: 0.1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    pub fn operation_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.operation_cache_ttl_ms)
    }

    /// Loads the `engine` section from the default config path.
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Loads the `engine` section from `path`. A missing file yields defaults;
    /// an unparsable one is logged and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<ConfigDocument>(&content) {
            Ok(document) => document.engine,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unparsable engine config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_engine_section_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"catalog_path": "nodes.json", "engine": {{"min_confidence": 0.5}}}}"#).expect("write config");

        let config = EngineConfig::load_from(file.path());
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.default_max_results, 5);
        assert_eq!(config.operation_cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn missing_or_invalid_file_yields_defaults() {
        assert_eq!(EngineConfig::load_from(Path::new("/nonexistent/config.json")), EngineConfig::default());

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write config");
        assert_eq!(EngineConfig::load_from(file.path()), EngineConfig::default());
    }
}

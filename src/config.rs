//! Shared config utility for loading JSON config files,
//! plus the generator's own settings.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lumoface.json";

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!("[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] Failed to parse config {}: {}, using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::debug!(
                "[{}] No config file at {}, using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

// ── App Config ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Where menu option 3 writes the catalog.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    #[serde(default = "default_sequence_count")]
    pub default_sequence_count: usize,
    #[serde(default = "default_simulation_secs")]
    pub default_simulation_secs: u64,
    /// Fixed RNG seed for reproducible draws.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Load emotions from this file instead of the built-in set.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_export_path() -> PathBuf {
    PathBuf::from("emotions.json")
}

fn default_sequence_count() -> usize {
    10
}

fn default_simulation_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_path: default_export_path(),
            default_sequence_count: default_sequence_count(),
            default_simulation_secs: default_simulation_secs(),
            seed: None,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Self {
        load_json_config(path, "config")
    }

    /// Seeded RNG when `seed` is set, OS entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load(&tmp.path().join(CONFIG_FILE_NAME));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.export_path, PathBuf::from("emotions.json"));
        assert_eq!(config.default_sequence_count, 10);
        assert_eq!(config.default_simulation_secs, 60);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "seed": 42, "default_sequence_count": 3 }"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.default_sequence_count, 3);
        assert_eq!(config.default_simulation_secs, 60);
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn full_file_overrides_every_setting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"{
              "export_path": "out/faces.json",
              "default_sequence_count": 4,
              "default_simulation_secs": 15,
              "seed": 7,
              "catalog_path": "faces.json"
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.export_path, PathBuf::from("out/faces.json"));
        assert_eq!(config.default_sequence_count, 4);
        assert_eq!(config.default_simulation_secs, 15);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.catalog_path, Some(PathBuf::from("faces.json")));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = AppConfig {
            seed: Some(99),
            ..AppConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}

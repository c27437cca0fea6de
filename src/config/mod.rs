use crate::catalog::Candidate;
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "~/.config/dorank/config.yaml";
const DEFAULT_CACHE_PATH: &str = "~/.cache/dorank";
const STORE_FILE_NAME: &str = "relevance.db";

/// Relevance store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StoreBackend {
    #[serde(rename = "sqlite")]
    #[default]
    Sqlite,
    #[serde(rename = "memory")]
    Memory,
    /// Learning disabled, every bias reads as zero
    #[serde(rename = "none")]
    None,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file; defaults to `<cache_path>/relevance.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Weights for combining text match and learned bias
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Maximum relative boost or penalty from learned bias, in (0, 1)
    #[serde(default = "default_bias_weight")]
    pub bias_weight: f64,
    /// Counter value at which half of the boost is reached
    #[serde(default = "default_bias_softness")]
    pub bias_softness: f64,
    /// Share of a candidate's overall history added to the per-query bias
    #[serde(default = "default_item_weight")]
    pub item_weight: f64,
    /// Fall back to matching descriptions when the name does not match
    #[serde(default)]
    pub match_description: bool,
}

fn default_bias_weight() -> f64 {
    0.5
}

fn default_bias_softness() -> f64 {
    5.0
}

fn default_item_weight() -> f64 {
    0.25
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            bias_weight: default_bias_weight(),
            bias_softness: default_bias_softness(),
            item_weight: default_item_weight(),
            match_description: false,
        }
    }
}

impl RankingConfig {
    /// Check the ranges that keep reinforcement monotonic and scores positive
    pub fn validate(&self) -> Result<(), crate::error::RankError> {
        use crate::error::RankError;

        if !(self.bias_weight > 0.0 && self.bias_weight < 1.0) {
            return Err(RankError::InvalidConfig(format!(
                "bias_weight must be in (0, 1), got {}",
                self.bias_weight
            )));
        }
        if !(self.bias_softness > 0.0 && self.bias_softness.is_finite()) {
            return Err(RankError::InvalidConfig(format!(
                "bias_softness must be positive, got {}",
                self.bias_softness
            )));
        }
        if !(self.item_weight >= 0.0 && self.item_weight.is_finite()) {
            return Err(RankError::InvalidConfig(format!(
                "item_weight must be non-negative, got {}",
                self.item_weight
            )));
        }
        Ok(())
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relevance store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Ranking weights
    #[serde(default)]
    pub ranking: RankingConfig,

    /// YAML file listing catalog candidates
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Candidates declared inline
    #[serde(default)]
    pub catalog: Vec<Candidate>,

    /// Cache directory
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    expand_path(DEFAULT_CACHE_PATH)
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when absent
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let config_path = path.as_ref();

        let config = if config_path.exists() {
            info!("Loading configuration from: {:?}", config_path);
            let content = fs::read_to_string(config_path)?;
            Self::from_yaml(&content)
                .with_context(|| format!("Invalid configuration: {}", config_path.display()))?
        } else {
            info!("Configuration not found, using defaults");
            Self::default()
        };

        config.ranking.validate()?;
        Ok(config)
    }

    /// Parse YAML, expanding `~` in every path
    pub fn from_yaml(content: &str) -> Result<Self, anyhow::Error> {
        // serde's #[serde(default)] handles all defaults during deserialization
        let mut config: Config = serde_yaml::from_str(content)?;

        config.cache_path = expand_path(&config.cache_path.to_string_lossy());
        if let Some(path) = config.store.path.take() {
            config.store.path = Some(expand_path(&path.to_string_lossy()));
        }
        if let Some(path) = config.catalog_path.take() {
            config.catalog_path = Some(expand_path(&path.to_string_lossy()));
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), anyhow::Error> {
        let config_path = path.as_ref();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(config_path, content)?;

        info!("Configuration saved to: {:?}", config_path);
        Ok(())
    }

    /// Path of the SQLite relevance database
    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) => path.clone(),
            None => self.cache_path.join(STORE_FILE_NAME),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            ranking: RankingConfig::default(),
            catalog_path: None,
            catalog: Vec::new(),
            cache_path: default_cache_path(),
        }
    }
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    expand_path(DEFAULT_CONFIG_PATH)
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_defaults_valid() {
        assert!(RankingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ranking_rejects_bias_weight_out_of_range() {
        for weight in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let ranking = RankingConfig {
                bias_weight: weight,
                ..RankingConfig::default()
            };
            assert!(ranking.validate().is_err(), "weight {} should be rejected", weight);
        }
    }

    #[test]
    fn test_ranking_rejects_bad_softness() {
        let ranking = RankingConfig {
            bias_softness: 0.0,
            ..RankingConfig::default()
        };
        assert!(ranking.validate().is_err());
    }

    #[test]
    fn test_store_path_default() {
        let config = Config {
            cache_path: PathBuf::from("/tmp/dorank-cache"),
            ..Config::default()
        };
        assert_eq!(config.store_path(), PathBuf::from("/tmp/dorank-cache/relevance.db"));
    }

    #[test]
    fn test_store_path_override() {
        let yaml = "store:\n  backend: sqlite\n  path: /tmp/elsewhere.db\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/tmp/elsewhere.db"));
    }

    #[test]
    fn test_tilde_expanded() {
        let config = Config::from_yaml("cache_path: ~/somewhere\n").unwrap();
        assert!(!config.cache_path.to_string_lossy().starts_with('~'));
    }
}

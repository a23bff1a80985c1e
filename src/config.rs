use crate::error::{ConfigError, TrainerResult};
use crate::strategy::{StrategyKind, WeightedRandomStrategy, DEFAULT_FLOOR_WEIGHT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub alphabet: String,
    pub strategy: StrategyKind,
    pub floor_weight: f64,
    pub rounds: usize,
    pub ranking_limit: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            strategy: StrategyKind::Weighted,
            floor_weight: DEFAULT_FLOOR_WEIGHT,
            rounds: 50,
            ranking_limit: 10,
            seed: None,
        }
    }
}

impl Config {
    /// Reject settings that would break a drill under any strategy, so a saved
    /// config stays usable when the strategy is switched later
    pub fn validate(&self) -> TrainerResult<()> {
        WeightedRandomStrategy::with_floor(self.floor_weight)?;
        Ok(())
    }
}

pub trait ConfigStore {
    /// Stored config, or the defaults when nothing usable is stored
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keydrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("keydrill_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like `load`, but reports why the stored config could not be read
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice::<Config>(&bytes)?)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "using default config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

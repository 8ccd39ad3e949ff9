use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::ConfigurationError;
use crate::language::{Corpus, DEFAULT_CORPUS};
use crate::session::{
    SessionConfig, DEFAULT_BATCH_SIZE, DEFAULT_DURATION_SECS, DEFAULT_SAMPLE_INTERVAL_SECS,
};

/// User preferences, stored as JSON between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u64,
    pub sample_interval_secs: u64,
    pub batch_size: usize,
    pub language: String,
    pub word_list: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
            language: DEFAULT_CORPUS.to_string(),
            word_list: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> Result<SessionConfig, ConfigurationError> {
        SessionConfig::new(self.duration_secs)?
            .with_sample_interval(self.sample_interval_secs)?
            .with_batch_size(self.batch_size)
    }

    /// Check everything that can be checked without touching a word list file.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.session_config()?;
        if self.word_list.is_none() && !Corpus::builtin_names().contains(&self.language) {
            return Err(ConfigurationError::UnknownCorpus(self.language.clone()));
        }
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        let cfg = match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring malformed config {}: {e}", self.path.display());
                return Config::default();
            }
        };
        match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                warn!("ignoring invalid config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

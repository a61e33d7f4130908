use crate::app_dirs::AppDirs;
use crate::kana::PracticeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: PracticeMode,
    pub triple: bool,
    /// How many weak characters a focused review draws on
    pub weak_set_size: usize,
    /// Pause between answering and the next question
    pub advance_delay_ms: u64,
    /// Save after this many answers; 0 saves only on exit
    pub autosave_every: usize,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: PracticeMode::KatakanaToHiragana,
            triple: false,
            weak_set_size: 10,
            advance_delay_ms: 2000,
            autosave_every: 0,
            data_dir: None,
        }
    }
}

impl Config {
    /// Explicit data dir, else the platform default, else the working directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(AppDirs::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
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
    #[allow(clippy::new_without_default)]
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
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring invalid config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

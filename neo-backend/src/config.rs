use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoConfig {
    #[serde(default = "default_neo_file")]
    pub neo_file: PathBuf,

    #[serde(default = "default_cad_file")]
    pub cad_file: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Result limit applied when the CLI gives none
    #[serde(default)]
    pub default_limit: Option<usize>,
}

fn default_neo_file() -> PathBuf {
    PathBuf::from("data/neos.csv")
}

fn default_cad_file() -> PathBuf {
    PathBuf::from("data/cad.json")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NeoConfig {
    fn default() -> Self {
        Self {
            neo_file: default_neo_file(),
            cad_file: default_cad_file(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            default_limit: None,
        }
    }
}

impl NeoConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NeoConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

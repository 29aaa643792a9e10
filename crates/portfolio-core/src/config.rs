use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ids::IdStrategy;
use crate::paths;
use crate::store::MissingFile;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed to call the API with credentials.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8470
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Whether a sender receives the relay of its own message.
    #[serde(default = "default_echo")]
    pub echo_to_sender: bool,
}

fn default_echo() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            echo_to_sender: default_echo(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Contents of `portfolio.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the collection files, relative to the root.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ids: IdStrategy,
    #[serde(default)]
    pub missing_file: MissingFile,
    /// Mount the `/skills` endpoints.
    #[serde(default = "default_skills")]
    pub skills: bool,
    #[serde(default)]
    pub chat: ChatConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_skills() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            ids: IdStrategy::default(),
            missing_file: MissingFile::default(),
            skills: default_skills(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load `portfolio.yaml` from `root`, falling back to defaults when the
    /// file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        // An empty file deserializes as unit, not as a mapping.
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        std::fs::write(paths::config_path(root), data)?;
        Ok(())
    }

    /// Absolute-or-root-relative directory for the collection files.
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        paths::data_dir(root, &self.data_dir)
    }
}

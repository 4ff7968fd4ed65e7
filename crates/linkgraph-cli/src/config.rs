//! CLI configuration loading and management.

use linkgraph::GraphOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `linkgraph.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Graph client options.
    #[serde(default = "default_graph")]
    pub graph: GraphOptions,

    /// Local wallet settings.
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// File holding the hex-encoded wallet secret.
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
}

fn default_graph() -> GraphOptions {
    GraphOptions::new("linkgraph")
}
fn default_key_file() -> PathBuf {
    PathBuf::from("linkgraph.key")
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            graph: default_graph(),
            wallet: WalletConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: CliConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Key file path, resolved against the directory of the config file.
    pub fn key_path(&self, config_path: &Path) -> PathBuf {
        if self.wallet.key_file.is_absolute() {
            return self.wallet.key_file.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.wallet.key_file),
            None => self.wallet.key_file.clone(),
        }
    }
}

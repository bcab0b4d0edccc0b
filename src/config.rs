use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_LISTEN_ADDRESS, DEFAULT_ROOT, MAX_CHUNK_SIZE};
use crate::core_cli::Cli;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub root: PathBuf,
    pub chunk_size: usize,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            root: PathBuf::from(DEFAULT_ROOT),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        Ok(config)
    }

    /// Builds the effective configuration: defaults, then the file, then flags/env.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        if let Some(listen_address) = &cli.listen_address {
            config.server.listen_address = listen_address.clone();
        }
        if let Some(root) = &cli.root {
            config.server.root = root.clone();
        }
        if let Some(chunk_size) = cli.chunk_size {
            config.server.chunk_size = chunk_size;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let chunk_size = self.server.chunk_size;
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            bail!(
                "Invalid chunk size {}: must be between 1 and {}",
                chunk_size,
                MAX_CHUNK_SIZE
            );
        }
        if self.server.listen_address.trim().is_empty() {
            bail!("Listen address must not be empty");
        }
        Ok(())
    }

    /// The absolute, canonical root directory. Resolved once at startup.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let root = &self.server.root;
        let canonical = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve root directory: {}", root.display()))?;
        if !canonical.is_dir() {
            bail!("Root is not a directory: {}", canonical.display());
        }
        Ok(canonical)
    }
}

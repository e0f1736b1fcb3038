use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::ZeroQuantityPolicy;

/// Storage key the cart is kept under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings for a [`CartSystem`](super::CartSystem).
///
/// Loaded from TOML; every field has a default so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default)]
    pub zero_quantity: ZeroQuantityPolicy,
    /// When set, the cart is kept in a JSON file at this path. Otherwise it
    /// lives in memory for the life of the process.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_storage_key() -> String { DEFAULT_STORAGE_KEY.to_string() }
fn default_buffer_size() -> usize { 32 }

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            buffer_size: default_buffer_size(),
            zero_quantity: ZeroQuantityPolicy::default(),
            storage_path: None,
        }
    }
}

impl CartConfig {
    /// Reads the file named by `CART_CONFIG` if set, else uses defaults.
    /// `CART_STORAGE_PATH` overrides `storage_path` either way.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var_os("CART_CONFIG"),
            std::env::var_os("CART_STORAGE_PATH"),
        )
    }

    /// [`load`](Self::load) with the two environment values passed in.
    /// Empty values count as unset.
    pub fn resolve(
        config_path: Option<OsString>,
        storage_path: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = match config_path.filter(|p| !p.is_empty()) {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(path) = storage_path.filter(|p| !p.is_empty()) {
            cfg.storage_path = Some(PathBuf::from(path));
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be at least 1".into()));
        }
        Ok(())
    }
}

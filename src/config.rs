//! Configuration for vocab-admin-store

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::store::{DocumentStore, MemoryStore, SledStore};
use crate::error::StoreError;

/// Default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-admin")
}

/// Which document store to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local, lost on exit
    Memory,
    /// Persistent sled database under `data_dir`
    Sled,
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Directory for the persistent store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Items per page for paged collections
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Concurrent writes during bulk import
    #[serde(default = "default_import_concurrency")]
    pub import_concurrency: usize,
}

fn default_backend() -> Backend {
    Backend::Sled
}

fn default_page_size() -> usize {
    25
}

fn default_import_concurrency() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            import_concurrency: default_import_concurrency(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path of the sled database
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.sled")
    }

    /// Open the configured store as the shared handle every repo receives
    pub fn open_store(&self) -> Result<Arc<dyn DocumentStore>, StoreError> {
        match self.backend {
            Backend::Memory => {
                info!("Using in-memory document store");
                Ok(Arc::new(MemoryStore::new()))
            }
            Backend::Sled => {
                std::fs::create_dir_all(&self.data_dir)?;
                Ok(Arc::new(SledStore::open(self.store_path())?))
            }
        }
    }
}

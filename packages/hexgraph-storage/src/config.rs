//! Index configuration
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```yaml
//! region: hexastore
//! insert:
//!   max_attempts: 3
//! store:
//!   backend: sqlite
//!   pool_size: 8
//!   path: ./graph.db
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::DELIMITER;
use crate::error::{HexError, Result};

pub const DEFAULT_REGION: &str = "hexastore";
pub const DEFAULT_POOL_SIZE: usize = 16;
pub const DEFAULT_INSERT_ATTEMPTS: u32 = 3;
pub const MAX_INSERT_ATTEMPTS: u32 = 16;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HexastoreConfig {
    /// Name of the region holding all permutation keys
    pub region: String,
    pub insert: InsertPolicy,
    pub store: StoreConfig,
}

impl Default for HexastoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            insert: InsertPolicy::default(),
            store: StoreConfig::default(),
        }
    }
}

/// How hard `insert` tries when the store cannot write all six keys atomically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsertPolicy {
    /// Batch writes before giving up with `StoreUnavailable` (1..=16)
    pub max_attempts: u32,
}

impl Default for InsertPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_INSERT_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Sqlite,
}

/// Backing store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Maximum concurrently held connections
    pub pool_size: usize,
    /// Database file (sqlite only, `:memory:` allowed)
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            pool_size: DEFAULT_POOL_SIZE,
            path: None,
        }
    }
}

impl HexastoreConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: HexastoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(HexError::config("Field 'region' must not be empty"));
        }
        if self.region.as_bytes().contains(&DELIMITER) {
            return Err(HexError::config(format!(
                "Field 'region' must not contain '{}': {:?}",
                DELIMITER as char, self.region
            )));
        }
        if !(1..=MAX_INSERT_ATTEMPTS).contains(&self.insert.max_attempts) {
            return Err(range_error(
                "insert.max_attempts",
                self.insert.max_attempts,
                1,
                MAX_INSERT_ATTEMPTS,
            ));
        }
        if self.store.pool_size == 0 {
            return Err(HexError::config(
                "Invalid range for field 'store.pool_size': 0 not in 1.. (at least one connection)",
            ));
        }
        if self.store.backend == Backend::Sqlite && self.store.path.is_none() {
            return Err(HexError::config(
                "Field 'store.path' is required for the sqlite backend",
            ));
        }
        Ok(())
    }
}

fn range_error(field: &str, value: u32, min: u32, max: u32) -> HexError {
    HexError::config(format!(
        "Invalid range for field '{}': {} not in {}..={}",
        field, value, min, max
    ))
}

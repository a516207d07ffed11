//! In-Memory Ordered Store
//!
//! Regions are `BTreeMap`s keyed by member bytes, so iteration order is the
//! byte order the range scan needs. Connections are bounded by a semaphore.
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::{StoreConfig, DEFAULT_POOL_SIZE};
use crate::domain::codec::lex_range;
use crate::domain::{LexBound, OrderedStore, StoreConnection};
use crate::{HexError, Result};

type Regions = Arc<RwLock<HashMap<String, BTreeMap<Vec<u8>, f64>>>>;

#[derive(Clone)]
pub struct MemoryOrderedStore {
    regions: Regions,
    pool: Arc<Semaphore>,
    pool_size: usize,
}

impl MemoryOrderedStore {
    pub fn new() -> Self {
        Self::with_pool_size(DEFAULT_POOL_SIZE)
    }

    /// At least one connection is always allowed
    pub fn with_pool_size(pool_size: usize) -> Self {
        let pool_size = pool_size.max(1);
        Self {
            regions: Arc::new(RwLock::new(HashMap::new())),
            pool: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_pool_size(config.pool_size)
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Connections not currently held by anyone
    pub fn available_connections(&self) -> usize {
        self.pool.available_permits()
    }
}

impl Default for MemoryOrderedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderedStore for MemoryOrderedStore {
    type Connection = MemoryConnection;

    async fn connect(&self) -> Result<MemoryConnection> {
        let permit = self.pool.clone().acquire_owned().await.map_err(|e| {
            HexError::store_unavailable("memory store connection pool closed").with_source(e)
        })?;
        Ok(MemoryConnection {
            regions: self.regions.clone(),
            _permit: permit,
        })
    }
}

/// Connection handle; returns its pool slot on drop
pub struct MemoryConnection {
    regions: Regions,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn add_batch(&self, region: &str, entries: &[(f64, &str)]) -> Result<usize> {
        let mut regions = self.regions.write();
        let members = regions.entry(region.to_string()).or_default();
        let mut added = 0;
        for (score, member) in entries {
            if !members.contains_key(member.as_bytes()) {
                members.insert(member.as_bytes().to_vec(), *score);
                added += 1;
            }
        }
        Ok(added)
    }

    async fn range_by_lex(
        &self,
        region: &str,
        min: &LexBound,
        max: &LexBound,
    ) -> Result<Vec<String>> {
        let Some(range) = lex_range(min, max) else {
            return Ok(Vec::new());
        };
        let regions = self.regions.read();
        let Some(members) = regions.get(region) else {
            return Ok(Vec::new());
        };
        members
            .range::<[u8], _>(range)
            .map(|(member, _)| {
                String::from_utf8(member.clone())
                    .map_err(|e| HexError::corrupt_key(String::from_utf8_lossy(member)).with_source(e))
            })
            .collect()
    }

    async fn score(&self, region: &str, member: &str) -> Result<Option<f64>> {
        Ok(self
            .regions
            .read()
            .get(region)
            .and_then(|members| members.get(member.as_bytes()).copied()))
    }

    async fn cardinality(&self, region: &str) -> Result<usize> {
        Ok(self.regions.read().get(region).map_or(0, |m| m.len()))
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hexgraph_storage::{
    HexError, LexBound, MemoryConnection, MemoryOrderedStore, OrderedStore, Result,
    StoreConnection,
};

/// Fault plan for [`FaultyStore`]
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Range scans that succeed before every later one fails
    pub scans_before_failure: Option<usize>,
    /// Leading `add_batch` calls that only write the first half of the batch
    pub partial_writes: usize,
    /// Report batches as non-atomic
    pub non_atomic: bool,
    /// Delay before every range scan
    pub scan_delay: Option<Duration>,
}

/// Memory store wrapper that fails, truncates or stalls on request
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: MemoryOrderedStore,
    faults: Faults,
    scans: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new(faults: Faults) -> Self {
        Self {
            inner: MemoryOrderedStore::with_pool_size(4),
            faults,
            scans: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderedStore for FaultyStore {
    type Connection = FaultyConnection;

    async fn connect(&self) -> Result<FaultyConnection> {
        Ok(FaultyConnection {
            inner: self.inner.connect().await?,
            faults: self.faults.clone(),
            scans: self.scans.clone(),
            writes: self.writes.clone(),
        })
    }
}

pub struct FaultyConnection {
    inner: MemoryConnection,
    faults: Faults,
    scans: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

#[async_trait]
impl StoreConnection for FaultyConnection {
    async fn add_batch(&self, region: &str, entries: &[(f64, &str)]) -> Result<usize> {
        let write = self.writes.fetch_add(1, Ordering::SeqCst);
        if write < self.faults.partial_writes {
            return self.inner.add_batch(region, &entries[..entries.len() / 2]).await;
        }
        self.inner.add_batch(region, entries).await
    }

    async fn range_by_lex(
        &self,
        region: &str,
        min: &LexBound,
        max: &LexBound,
    ) -> Result<Vec<String>> {
        if let Some(delay) = self.faults.scan_delay {
            tokio::time::sleep(delay).await;
        }
        let scan = self.scans.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.faults.scans_before_failure {
            if scan >= limit {
                return Err(HexError::store_unavailable("injected range scan failure"));
            }
        }
        self.inner.range_by_lex(region, min, max).await
    }

    async fn score(&self, region: &str, member: &str) -> Result<Option<f64>> {
        self.inner.score(region, member).await
    }

    async fn cardinality(&self, region: &str) -> Result<usize> {
        self.inner.cardinality(region).await
    }

    fn atomic_batch(&self) -> bool {
        !self.faults.non_atomic
    }
}

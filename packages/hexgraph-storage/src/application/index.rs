//! Hexastore index over one region of an ordered store
//!
//! Every public operation acquires exactly one store connection for its
//! duration. Work that needs several round trips (the traversals) runs on an
//! [`IndexSession`], which keeps that one connection for all of them.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::traversal::{DepthTraversal, DiscoveryTraversal, FrontierOrder};
use crate::config::{HexastoreConfig, InsertPolicy};
use crate::domain::{
    object_component, range_prefix, LexBound, OrderedStore, PermutationKey, StoreConnection,
    Triple, CONSTANT_SCORE,
};
use crate::infrastructure::AnyOrderedStore;
use crate::{HexError, Result};

/// Triple index owning one named region
///
/// # Examples
///
/// ```rust
/// use hexgraph_storage::{HexastoreIndex, MemoryOrderedStore};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let index = HexastoreIndex::new(MemoryOrderedStore::new(), "graph");
/// index.insert("A", "likes", "B").await?;
/// index.insert("B", "likes", "C").await?;
///
/// let reachable = index.traverse_depth(1, "A", "likes").await?;
/// assert_eq!(reachable.into_iter().collect::<Vec<_>>(), vec!["B"]);
///
/// // B|likes|A is the OPS key of (A, likes, B)
/// assert_eq!(index.neighbors("B", "likes").await?, vec!["A", "C"]);
/// # Ok::<(), hexgraph_storage::HexError>(())
/// # }).unwrap();
/// ```
pub struct HexastoreIndex<S> {
    store: S,
    region: String,
    insert_policy: InsertPolicy,
}

impl<S: OrderedStore> HexastoreIndex<S> {
    pub fn new(store: S, region: impl Into<String>) -> Self {
        Self {
            store,
            region: region.into(),
            insert_policy: InsertPolicy::default(),
        }
    }

    pub fn from_config(store: S, config: &HexastoreConfig) -> Self {
        Self {
            store,
            region: config.region.clone(),
            insert_policy: config.insert,
        }
    }

    pub fn with_insert_policy(mut self, policy: InsertPolicy) -> Self {
        self.insert_policy = policy;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Acquire a connection scoped to the returned session
    pub async fn session(&self) -> Result<IndexSession<'_, S::Connection>> {
        let conn = self.store.connect().await?;
        Ok(IndexSession {
            conn,
            region: &self.region,
            insert_policy: self.insert_policy,
        })
    }

    /// Write all six permutation keys of `(subject, predicate, object)`
    ///
    /// Re-inserting an existing triple is a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidTriple` if a component contains the delimiter; nothing is
    ///   written and no connection is acquired
    /// - `StoreUnavailable` if the store fails or the keys could not all be
    ///   confirmed; the whole call may safely be retried
    pub async fn insert(&self, subject: &str, predicate: &str, object: &str) -> Result<()> {
        self.insert_triple(&Triple::new(subject, predicate, object)).await
    }

    pub async fn insert_triple(&self, triple: &Triple) -> Result<()> {
        triple.validate()?;
        self.session().await?.insert_triple(triple).await
    }

    /// Keys within `[start, end]`, in ascending byte order
    pub async fn range_query(&self, start: &LexBound, end: &LexBound) -> Result<Vec<String>> {
        self.session().await?.range_query(start, end).await
    }

    /// Whether all six keys of `triple` are present
    pub async fn contains(&self, triple: &Triple) -> Result<bool> {
        self.session().await?.contains(triple).await
    }

    /// Third components of every key prefixed by `(node, relation)`
    pub async fn neighbors(&self, node: &str, relation: &str) -> Result<Vec<String>> {
        self.session().await?.neighbors(node, relation).await
    }

    /// Every node reachable from `start` over `relation` within `max_depth` hops
    ///
    /// `start` is included only if some path leads back to it.
    pub async fn traverse_depth(
        &self,
        max_depth: usize,
        start: &str,
        relation: &str,
    ) -> Result<BTreeSet<String>> {
        let session = self.session().await?;
        DepthTraversal::new(max_depth)
            .run(&session, start, relation)
            .await
    }

    /// Nodes reachable from any of `starts`, in first-discovery order
    ///
    /// Walks the work list last-in-first-out; see [`DiscoveryTraversal`].
    pub async fn traverse_discovery<I>(
        &self,
        max_depth: usize,
        starts: I,
        relation: &str,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.traverse_discovery_with(max_depth, starts, relation, FrontierOrder::Lifo)
            .await
    }

    pub async fn traverse_discovery_with<I>(
        &self,
        max_depth: usize,
        starts: I,
        relation: &str,
        order: FrontierOrder,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let starts: Vec<String> = starts.into_iter().map(Into::into).collect();
        let session = self.session().await?;
        DiscoveryTraversal::new(max_depth)
            .with_order(order)
            .run(&session, &starts, relation)
            .await
    }
}

impl HexastoreIndex<AnyOrderedStore> {
    /// Validate `config` and open the store its `store.backend` names
    pub fn open(config: &HexastoreConfig) -> Result<Self> {
        config.validate()?;
        let store = AnyOrderedStore::from_config(&config.store)?;
        Ok(Self::from_config(store, config))
    }
}

/// One connection's worth of index access
pub struct IndexSession<'a, C> {
    conn: C,
    region: &'a str,
    insert_policy: InsertPolicy,
}

impl<C: StoreConnection> IndexSession<'_, C> {
    pub fn region(&self) -> &str {
        self.region
    }

    /// Write the six keys of `triple` on this session's connection
    ///
    /// Validates `triple` itself since a session is usable without going
    /// through [`HexastoreIndex::insert_triple`].
    pub async fn insert_triple(&self, triple: &Triple) -> Result<()> {
        triple.validate()?;
        let keys = triple.permutation_keys();
        let entries: Vec<(f64, &str)> = keys
            .iter()
            .map(|key| (CONSTANT_SCORE, key.as_str()))
            .collect();

        if self.conn.atomic_batch() {
            let added = self.conn.add_batch(self.region, &entries).await?;
            debug!("Inserted {:?} into {} ({} new keys)", triple, self.region, added);
            return Ok(());
        }

        // Non-atomic store: write, confirm all six, and rewrite until they are.
        let max_attempts = self.insert_policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            self.conn.add_batch(self.region, &entries).await?;
            let missing = self.missing_keys(&keys).await?;
            if missing == 0 {
                debug!(
                    "Inserted {:?} into {} after {} attempt(s)",
                    triple, self.region, attempt
                );
                return Ok(());
            }
            warn!(
                "Insert of {:?} incomplete ({} of 6 keys missing), attempt {}/{}",
                triple, missing, attempt, max_attempts
            );
        }

        Err(HexError::store_unavailable(format!(
            "could not confirm all permutation keys of {:?} after {} attempts",
            triple, max_attempts
        )))
    }

    pub async fn range_query(&self, start: &LexBound, end: &LexBound) -> Result<Vec<String>> {
        self.conn.range_by_lex(self.region, start, end).await
    }

    pub async fn contains(&self, triple: &Triple) -> Result<bool> {
        Ok(self.missing_keys(&triple.permutation_keys()).await? == 0)
    }

    pub async fn neighbors(&self, node: &str, relation: &str) -> Result<Vec<String>> {
        let (start, end) = range_prefix(node, relation);
        self.range_query(&start, &end)
            .await?
            .iter()
            .map(|key| object_component(key).map(str::to_string))
            .collect()
    }

    async fn missing_keys(&self, keys: &[PermutationKey]) -> Result<usize> {
        let mut missing = 0;
        for key in keys {
            if self.conn.score(self.region, key.as_str()).await?.is_none() {
                missing += 1;
            }
        }
        Ok(missing)
    }
}

//! Ordered Store Port (Trait Interface)
//!
//! Port/Adapter pattern for backend flexibility:
//! - Testing / embedded: in-process ordered map
//! - Persistent: SQLite
//!
//! Any store that keeps members of a named region in byte order and can
//! range-scan them lexicographically fits behind this port.

use std::sync::Arc;

use async_trait::async_trait;

use super::codec::LexBound;
use crate::Result;

/// Ordered store (connection factory)
///
/// A connection is a scoped resource: it is released when dropped, on every
/// exit path including cancellation of the future holding it.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    type Connection: StoreConnection;

    /// Acquire a connection, waiting for pool capacity if needed
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the store cannot be reached.
    async fn connect(&self) -> Result<Self::Connection>;
}

/// One acquired connection to an ordered store
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Add `(score, member)` entries to `region`
    ///
    /// Members already present are left as they are. Returns how many members
    /// were newly added.
    async fn add_batch(&self, region: &str, entries: &[(f64, &str)]) -> Result<usize>;

    /// Members of `region` within `[min, max]`, in ascending byte order
    ///
    /// Assumes every member carries the same score, so score order and
    /// lexicographic order agree.
    async fn range_by_lex(&self, region: &str, min: &LexBound, max: &LexBound)
        -> Result<Vec<String>>;

    /// Score of `member`, or `None` if absent
    async fn score(&self, region: &str, member: &str) -> Result<Option<f64>>;

    /// Number of members in `region`
    async fn cardinality(&self, region: &str) -> Result<usize>;

    /// Whether `add_batch` is all-or-nothing
    fn atomic_batch(&self) -> bool {
        true
    }
}

#[async_trait]
impl<S: OrderedStore> OrderedStore for Arc<S> {
    type Connection = S::Connection;

    async fn connect(&self) -> Result<Self::Connection> {
        (**self).connect().await
    }
}

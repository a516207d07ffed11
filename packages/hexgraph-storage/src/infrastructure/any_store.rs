//! Config-selected Ordered Store
//!
//! Dispatches to the adapter named by `store.backend`.
use async_trait::async_trait;

use crate::config::{Backend, StoreConfig};
use crate::domain::{LexBound, OrderedStore, StoreConnection};
use crate::infrastructure::{MemoryConnection, MemoryOrderedStore};
#[cfg(feature = "sqlite")]
use crate::infrastructure::{SqliteConnection, SqliteOrderedStore};
use crate::Result;
#[cfg(not(feature = "sqlite"))]
use crate::HexError;

#[derive(Clone)]
pub enum AnyOrderedStore {
    Memory(MemoryOrderedStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOrderedStore),
}

impl AnyOrderedStore {
    /// Open the adapter selected by `config.backend`
    ///
    /// # Errors
    ///
    /// `Config` if the sqlite backend is selected without a path, or the crate
    /// was built without the `sqlite` feature.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            Backend::Memory => Ok(AnyOrderedStore::Memory(MemoryOrderedStore::from_config(
                config,
            ))),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => Ok(AnyOrderedStore::Sqlite(SqliteOrderedStore::from_config(
                config,
            )?)),
            #[cfg(not(feature = "sqlite"))]
            Backend::Sqlite => Err(HexError::config(
                "Backend 'sqlite' requires the 'sqlite' feature",
            )),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            AnyOrderedStore::Memory(_) => Backend::Memory,
            #[cfg(feature = "sqlite")]
            AnyOrderedStore::Sqlite(_) => Backend::Sqlite,
        }
    }

    pub fn available_connections(&self) -> usize {
        match self {
            AnyOrderedStore::Memory(store) => store.available_connections(),
            #[cfg(feature = "sqlite")]
            AnyOrderedStore::Sqlite(store) => store.available_connections(),
        }
    }
}

#[async_trait]
impl OrderedStore for AnyOrderedStore {
    type Connection = AnyConnection;

    async fn connect(&self) -> Result<AnyConnection> {
        match self {
            AnyOrderedStore::Memory(store) => Ok(AnyConnection::Memory(store.connect().await?)),
            #[cfg(feature = "sqlite")]
            AnyOrderedStore::Sqlite(store) => Ok(AnyConnection::Sqlite(store.connect().await?)),
        }
    }
}

pub enum AnyConnection {
    Memory(MemoryConnection),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
}

impl AnyConnection {
    fn inner(&self) -> &dyn StoreConnection {
        match self {
            AnyConnection::Memory(conn) => conn,
            #[cfg(feature = "sqlite")]
            AnyConnection::Sqlite(conn) => conn,
        }
    }
}

#[async_trait]
impl StoreConnection for AnyConnection {
    async fn add_batch(&self, region: &str, entries: &[(f64, &str)]) -> Result<usize> {
        self.inner().add_batch(region, entries).await
    }

    async fn range_by_lex(
        &self,
        region: &str,
        min: &LexBound,
        max: &LexBound,
    ) -> Result<Vec<String>> {
        self.inner().range_by_lex(region, min, max).await
    }

    async fn score(&self, region: &str, member: &str) -> Result<Option<f64>> {
        self.inner().score(region, member).await
    }

    async fn cardinality(&self, region: &str) -> Result<usize> {
        self.inner().cardinality(region).await
    }

    fn atomic_batch(&self) -> bool {
        self.inner().atomic_batch()
    }
}

//! hexgraph-storage - Hexastore triple index over an ordered string store
//!
//! Each `(subject, predicate, object)` triple is written as its six
//! `|`-joined permutations into one region of a lexicographically ordered
//! store. Fixing any two components and range-scanning yields every third.
//!
//! ## Layers
//!
//! 1. **domain**: `Triple`, permutation codec, range bounds, `OrderedStore` port
//! 2. **infrastructure**: in-memory and SQLite stores
//! 3. **application**: `HexastoreIndex` and the two traversals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hexgraph_storage::{HexastoreConfig, HexastoreIndex};
//!
//! let config = HexastoreConfig::from_yaml_file("hexgraph.yaml")?;
//! // memory or sqlite, per `store.backend`
//! let index = HexastoreIndex::open(&config)?;
//!
//! index.insert("alice", "knows", "bob").await?;
//! index.insert("bob", "knows", "carol").await?;
//!
//! // Set of nodes within two hops
//! let near = index.traverse_depth(2, "alice", "knows").await?;
//!
//! // First-discovery order from several starting points
//! let order = index.traverse_discovery(2, ["alice", "dave"], "knows").await?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, HexError, Result};

pub use application::{
    DepthTraversal, DiscoveryTraversal, FrontierOrder, HexastoreIndex, IndexSession,
};
pub use config::{Backend, HexastoreConfig, InsertPolicy, StoreConfig};
pub use domain::{
    encode_permutations, range_prefix, LexBound, OrderedStore, Permutation, PermutationKey,
    StoreConnection, Triple,
};

pub use infrastructure::{AnyConnection, AnyOrderedStore, MemoryConnection, MemoryOrderedStore};
#[cfg(feature = "sqlite")]
pub use infrastructure::{SqliteConnection, SqliteOrderedStore};

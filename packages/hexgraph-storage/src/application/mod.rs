//! Application layer
//!
//! ```text
//! HexastoreIndex (insert / range_query / traversals)
//!        ↓ one connection per operation
//! IndexSession ──→ DepthTraversal, DiscoveryTraversal
//!        ↓
//! StoreConnection (memory, SQLite)
//! ```

pub mod index;
pub mod traversal;

pub use index::{HexastoreIndex, IndexSession};
pub use traversal::{DepthTraversal, DiscoveryTraversal, FrontierOrder};

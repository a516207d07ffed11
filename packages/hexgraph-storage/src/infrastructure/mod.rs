//! Infrastructure layer - Ordered store adapters

pub mod memory_store;
pub use memory_store::{MemoryConnection, MemoryOrderedStore};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteOrderedStore};

pub mod any_store;
pub use any_store::{AnyConnection, AnyOrderedStore};

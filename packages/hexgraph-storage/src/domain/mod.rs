//! Domain layer for the hexastore index
//!
//! # Domain Models
//!
//! - `Triple`: a (subject, predicate, object) fact
//! - `Permutation` / `PermutationKey`: the six persisted orderings of a triple
//! - `LexBound`: one end of a lexicographic range scan
//!
//! # Port Trait
//!
//! - `OrderedStore`: the ordered string container the index lives in

pub mod codec;
pub mod ports;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use codec::{
    encode_permutations, object_component, range_prefix, LexBound, Permutation, PermutationKey,
    CONSTANT_SCORE, DELIMITER, HIGH_SENTINEL,
};
pub use ports::{OrderedStore, StoreConnection};

/// A (subject, predicate, object) fact
///
/// Components are opaque strings. Construction is infallible; the index calls
/// [`Triple::validate`] before anything is written.
///
/// # Examples
///
/// ```rust
/// use hexgraph_storage::domain::Triple;
///
/// let triple = Triple::new("alice", "knows", "bob");
/// assert!(triple.validate().is_ok());
/// assert!(Triple::new("a|b", "knows", "bob").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Check that no component contains the delimiter
    pub fn validate(&self) -> Result<()> {
        codec::validate_component("subject", &self.subject)?;
        codec::validate_component("predicate", &self.predicate)?;
        codec::validate_component("object", &self.object)?;
        Ok(())
    }

    pub fn permutation_keys(&self) -> [PermutationKey; 6] {
        encode_permutations(self)
    }
}

//! Permutation codec
//!
//! Every triple is stored as six `|`-joined keys, one per ordering of its
//! components. Two leading components plus a range scan then answer any
//! "which thirds exist for (a, b)" question.
//!
//! ```text
//! (A, likes, B)
//!   SPO  A|likes|B        PSO  likes|A|B
//!   SOP  A|B|likes        OPS  B|likes|A
//!   POS  likes|B|A        OSP  B|A|likes
//! ```
//!
//! Range bounds follow the lexicographic range syntax of sorted-set stores:
//! `[` inclusive, `(` exclusive, `-` and `+` for the open ends.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

use crate::domain::Triple;
use crate::error::{HexError, Result};

/// Component separator inside a permutation key
pub const DELIMITER: u8 = b'|';

/// Upper-bound byte, above every byte of a valid UTF-8 component
pub const HIGH_SENTINEL: u8 = 0xFF;

/// Score attached to every permutation key (the store requires one)
pub const CONSTANT_SCORE: f64 = 0.0;

/// Key orderings, in the order they are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permutation {
    Spo,
    Sop,
    Pos,
    Pso,
    Ops,
    Osp,
}

impl Permutation {
    pub const ALL: [Permutation; 6] = [
        Permutation::Spo,
        Permutation::Sop,
        Permutation::Pos,
        Permutation::Pso,
        Permutation::Ops,
        Permutation::Osp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permutation::Spo => "spo",
            Permutation::Sop => "sop",
            Permutation::Pos => "pos",
            Permutation::Pso => "pso",
            Permutation::Ops => "ops",
            Permutation::Osp => "osp",
        }
    }

    /// Components of `triple` in this permutation's order
    pub fn arrange<'a>(&self, triple: &'a Triple) -> [&'a str; 3] {
        let (s, p, o) = (
            triple.subject.as_str(),
            triple.predicate.as_str(),
            triple.object.as_str(),
        );
        match self {
            Permutation::Spo => [s, p, o],
            Permutation::Sop => [s, o, p],
            Permutation::Pos => [p, o, s],
            Permutation::Pso => [p, s, o],
            Permutation::Ops => [o, p, s],
            Permutation::Osp => [o, s, p],
        }
    }

    pub fn encode(&self, triple: &Triple) -> PermutationKey {
        let [a, b, c] = self.arrange(triple);
        let mut key = String::with_capacity(a.len() + b.len() + c.len() + 2);
        key.push_str(a);
        key.push(DELIMITER as char);
        key.push_str(b);
        key.push(DELIMITER as char);
        key.push_str(c);
        PermutationKey(key)
    }

    /// Recover the triple from a key written with this permutation
    ///
    /// # Errors
    ///
    /// `CorruptKey` unless the key has exactly three components.
    pub fn decode(&self, key: &str) -> Result<Triple> {
        let mut parts = key.split(DELIMITER as char);
        let (a, b, c) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => return Err(HexError::corrupt_key(key)),
        };
        let (s, p, o) = match self {
            Permutation::Spo => (a, b, c),
            Permutation::Sop => (a, c, b),
            Permutation::Pos => (c, a, b),
            Permutation::Pso => (b, a, c),
            Permutation::Ops => (c, b, a),
            Permutation::Osp => (b, c, a),
        };
        Ok(Triple::new(s, p, o))
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `|`-joined key, exactly as persisted in the index region
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PermutationKey(String);

impl PermutationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PermutationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All six keys of `triple`, in SPO, SOP, POS, PSO, OPS, OSP order
pub fn encode_permutations(triple: &Triple) -> [PermutationKey; 6] {
    Permutation::ALL.map(|perm| perm.encode(triple))
}

/// Reject components that would make prefix boundaries ambiguous
///
/// Only the delimiter needs checking: `HIGH_SENTINEL` is not a valid UTF-8
/// byte, so no `&str` can contain it.
pub fn validate_component(field: &str, value: &str) -> Result<()> {
    if value.as_bytes().contains(&DELIMITER) {
        return Err(HexError::invalid_triple(format!(
            "{} contains the reserved delimiter '{}': {:?}",
            field, DELIMITER as char, value
        )));
    }
    Ok(())
}

/// Range covering every key whose first two components are `(a, b)`
///
/// `start = [a|b|`, `end = [a|b|\xff`. Both are inclusive.
pub fn range_prefix(a: &str, b: &str) -> (LexBound, LexBound) {
    let mut prefix = Vec::with_capacity(a.len() + b.len() + 3);
    prefix.extend_from_slice(a.as_bytes());
    prefix.push(DELIMITER);
    prefix.extend_from_slice(b.as_bytes());
    prefix.push(DELIMITER);

    let mut end = prefix.clone();
    end.push(HIGH_SENTINEL);
    (LexBound::Inclusive(prefix), LexBound::Inclusive(end))
}

/// Third component of a key
///
/// Anything after a fourth delimiter is ignored, matching how keys written by
/// other clients of the same region are read.
pub fn object_component(key: &str) -> Result<&str> {
    key.split(DELIMITER as char)
        .nth(2)
        .ok_or_else(|| HexError::corrupt_key(key))
}

/// One end of a lexicographic range scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexBound {
    /// `-`: below every key
    Min,
    /// `+`: above every key
    Max,
    /// `[bytes`
    Inclusive(Vec<u8>),
    /// `(bytes`
    Exclusive(Vec<u8>),
}

impl LexBound {
    pub fn inclusive(value: impl AsRef<[u8]>) -> Self {
        LexBound::Inclusive(value.as_ref().to_vec())
    }

    pub fn exclusive(value: impl AsRef<[u8]>) -> Self {
        LexBound::Exclusive(value.as_ref().to_vec())
    }

    /// Parse the wire form (`[abc`, `(abc`, `-`, `+`)
    pub fn parse(wire: &[u8]) -> Result<Self> {
        match wire {
            b"-" => Ok(LexBound::Min),
            b"+" => Ok(LexBound::Max),
            [b'[', rest @ ..] => Ok(LexBound::Inclusive(rest.to_vec())),
            [b'(', rest @ ..] => Ok(LexBound::Exclusive(rest.to_vec())),
            _ => Err(HexError::invalid_range(format!(
                "range bound must start with '[' or '(', or be '-' / '+': {:?}",
                String::from_utf8_lossy(wire)
            ))),
        }
    }

    /// Wire form, bracket marker included
    pub fn to_wire(&self) -> Vec<u8> {
        match self {
            LexBound::Min => b"-".to_vec(),
            LexBound::Max => b"+".to_vec(),
            LexBound::Inclusive(v) => {
                let mut out = Vec::with_capacity(v.len() + 1);
                out.push(b'[');
                out.extend_from_slice(v);
                out
            }
            LexBound::Exclusive(v) => {
                let mut out = Vec::with_capacity(v.len() + 1);
                out.push(b'(');
                out.extend_from_slice(v);
                out
            }
        }
    }
}

/// Convert a `(min, max)` pair into `std::ops::Bound`s
///
/// Returns `None` when the range can match nothing, so callers never hand an
/// inverted range to `BTreeMap::range` (which panics on one).
pub fn lex_range<'a>(
    min: &'a LexBound,
    max: &'a LexBound,
) -> Option<(Bound<&'a [u8]>, Bound<&'a [u8]>)> {
    let lower = match min {
        LexBound::Min => Bound::Unbounded,
        LexBound::Max => return None,
        LexBound::Inclusive(v) => Bound::Included(v.as_slice()),
        LexBound::Exclusive(v) => Bound::Excluded(v.as_slice()),
    };
    let upper = match max {
        LexBound::Max => Bound::Unbounded,
        LexBound::Min => return None,
        LexBound::Inclusive(v) => Bound::Included(v.as_slice()),
        LexBound::Exclusive(v) => Bound::Excluded(v.as_slice()),
    };

    let (lo, lo_inclusive) = match lower {
        Bound::Included(v) => (v, true),
        Bound::Excluded(v) => (v, false),
        Bound::Unbounded => return Some((lower, upper)),
    };
    let (hi, hi_inclusive) = match upper {
        Bound::Included(v) => (v, true),
        Bound::Excluded(v) => (v, false),
        Bound::Unbounded => return Some((lower, upper)),
    };
    match lo.cmp(hi) {
        Ordering::Greater => None,
        Ordering::Equal if !(lo_inclusive && hi_inclusive) => None,
        _ => Some((lower, upper)),
    }
}

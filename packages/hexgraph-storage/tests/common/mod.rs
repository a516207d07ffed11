//! Common test utilities for hexgraph-storage
//!
//! Fixtures and a fault-injecting store wrapper shared by the integration
//! tests.

#![allow(dead_code)]

mod faulty_store;
mod fixtures;

pub use faulty_store::*;
pub use fixtures::*;

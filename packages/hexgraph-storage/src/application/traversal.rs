//! Graph traversals over one relation
//!
//! Both walks read edges as `(node, relation) -> object` range scans on an
//! [`IndexSession`] and keep all frontier state local to one call.
//!
//! The six keys of `(a, r, b)` are also the six keys of `(b, r, a)`, so a
//! `(node, relation)` scan returns the far end of every `relation` edge
//! touching `node`, whichever side it was inserted on.
//!
//! | | DepthTraversal | DiscoveryTraversal |
//! |---|---|---|
//! | starts | one node | one or more nodes |
//! | result | set | first-discovery order |
//! | start pre-seeded as seen | no | yes |
//! | `max_depth = 0` | empty, no scans | start nodes expanded once |

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, trace};

use super::index::IndexSession;
use crate::domain::StoreConnection;
use crate::Result;

/// Depth-bounded walk with one visited set for the whole call
///
/// The frontier advances one hop per level: every frontier node is scanned,
/// and the nodes not yet visited become the next frontier. A node claimed once
/// is never expanded again, so each node is scanned at most once and only set
/// membership is meaningful, not the level a node was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthTraversal {
    max_depth: usize,
}

impl DepthTraversal {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub async fn run<C: StoreConnection>(
        &self,
        session: &IndexSession<'_, C>,
        start: &str,
        relation: &str,
    ) -> Result<BTreeSet<String>> {
        let mut visited = BTreeSet::new();
        let mut frontier = vec![start.to_string()];
        let mut level = 0;
        let mut scans = 0usize;

        while level < self.max_depth && !frontier.is_empty() {
            level += 1;
            let mut next = Vec::new();
            for node in &frontier {
                let fresh = session
                    .neighbors(node, relation)
                    .await?
                    .into_iter()
                    .filter(|object| visited.insert(object.clone()));
                next.extend(fresh);
                scans += 1;
            }
            trace!(
                "level {}: {} scanned, {} new",
                level,
                frontier.len(),
                next.len()
            );
            frontier = next;
        }

        debug!(
            "Depth traversal from {} over {} (max {}): {} nodes, {} scans",
            start,
            relation,
            self.max_depth,
            visited.len(),
            scans
        );
        Ok(visited)
    }
}

/// Which end of the work list the discovery walk takes from
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FrontierOrder {
    /// End of the list: depth-first discovery order
    #[default]
    Lifo,
    /// Front of the list: breadth layer order
    Fifo,
}

/// Work-list walk returning nodes in the order they were first seen
///
/// Start nodes count as seen and are never emitted. A node taken at depth `d`
/// has its new neighbors appended to the output, and queued at `d + 1` only
/// while `d < max_depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryTraversal {
    max_depth: usize,
    order: FrontierOrder,
}

impl DiscoveryTraversal {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            order: FrontierOrder::Lifo,
        }
    }

    pub fn with_order(mut self, order: FrontierOrder) -> Self {
        self.order = order;
        self
    }

    pub async fn run<C: StoreConnection>(
        &self,
        session: &IndexSession<'_, C>,
        starts: &[String],
        relation: &str,
    ) -> Result<Vec<String>> {
        let mut seen: HashSet<String> = starts.iter().cloned().collect();
        let mut work: VecDeque<(usize, String)> =
            starts.iter().map(|node| (0, node.clone())).collect();
        let mut discovered = Vec::new();

        while let Some((depth, node)) = self.take(&mut work) {
            let fresh: Vec<String> = session
                .neighbors(&node, relation)
                .await?
                .into_iter()
                .filter(|object| seen.insert(object.clone()))
                .collect();
            trace!(
                "depth {}: {} --{}--> {} new",
                depth,
                node,
                relation,
                fresh.len()
            );

            if depth < self.max_depth {
                work.extend(fresh.iter().map(|object| (depth + 1, object.clone())));
            }
            discovered.extend(fresh);
        }

        debug!(
            "Discovery traversal from {} start node(s) over {} (max {}, {:?}): {} nodes",
            starts.len(),
            relation,
            self.max_depth,
            self.order,
            discovered.len()
        );
        Ok(discovered)
    }

    fn take(&self, work: &mut VecDeque<(usize, String)>) -> Option<(usize, String)> {
        match self.order {
            FrontierOrder::Lifo => work.pop_back(),
            FrontierOrder::Fifo => work.pop_front(),
        }
    }
}

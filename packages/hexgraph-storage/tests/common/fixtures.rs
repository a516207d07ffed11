use std::collections::BTreeSet;

use hexgraph_storage::{HexastoreIndex, MemoryOrderedStore, OrderedStore};

/// Edges of the worked example: A likes B, B likes C, A likes C
pub const LIKES: &[(&str, &str, &str)] = &[
    ("A", "likes", "B"),
    ("B", "likes", "C"),
    ("A", "likes", "C"),
];

pub async fn insert_all<S: OrderedStore>(
    index: &HexastoreIndex<S>,
    triples: &[(&str, &str, &str)],
) {
    for (s, p, o) in triples {
        index.insert(s, p, o).await.expect("insert failed");
    }
}

pub async fn memory_index(triples: &[(&str, &str, &str)]) -> HexastoreIndex<MemoryOrderedStore> {
    let index = HexastoreIndex::new(MemoryOrderedStore::new(), "hexastore");
    insert_all(&index, triples).await;
    index
}

pub fn node_set(nodes: &[&str]) -> BTreeSet<String> {
    nodes.iter().map(|n| n.to_string()).collect()
}

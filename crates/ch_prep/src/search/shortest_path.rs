use crate::constants::Weight;
use crate::graph::{EdgeIndex, NodeIndex};

/// Result of a shortest path search. `edges` holds original (non-shortcut)
/// edges in travel order; `weight` has the caller-supplied weight inversion
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub weight: Weight,
}

impl ShortestPath {
    pub fn new(nodes: Vec<NodeIndex>, edges: Vec<EdgeIndex>, weight: Weight) -> Self {
        ShortestPath {
            nodes,
            edges,
            weight,
        }
    }
}

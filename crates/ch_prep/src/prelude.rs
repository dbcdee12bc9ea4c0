//! Re-exports of the most commonly used items in `ch_prep`.
pub use crate::contraction_params::PriorityParams;
pub use crate::node_contraction::NodeContractor;

pub use crate::search;
pub use crate::search::{BidirSearch, Dijkstra, ShortestPath};

pub use crate::graph::{node_index, EdgeFlags, LevelGraph, NodeIndex};
pub use crate::util::test_graphs::generate_simple_graph;

//! Shortest path algorithms on a [`LevelGraph`].
//!
//! [`Dijkstra`] searches the original edges and serves as the reference;
//! [`BidirSearch`] is the bidirectional search whose prepared configuration
//! exploits the contraction hierarchy.
//!
//! [`LevelGraph`]: crate::graph::LevelGraph
pub mod bidir_search;
pub mod dijkstra;
pub mod shortest_path;

pub use bidir_search::BidirSearch;
pub use dijkstra::Dijkstra;
pub use shortest_path::ShortestPath;

#[cfg(test)]
pub(crate) fn assert_no_path(path: Option<ShortestPath>) {
    assert!(path.is_none(), "expected no path, got {:?}", path);
}

#[cfg(test)]
pub(crate) fn assert_path(
    expected_nodes: Vec<usize>,
    expected_weight: crate::constants::Weight,
    path: Option<ShortestPath>,
) {
    let path = path.expect("expected a path");
    assert_eq!(
        expected_nodes
            .iter()
            .map(|i| crate::graph::node_index(*i))
            .collect::<Vec<_>>(),
        path.nodes
    );
    assert_eq!(expected_weight, path.weight);
}

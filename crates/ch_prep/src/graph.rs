//! The level graph. A directed graph stored as adjacency lists whose edges
//! carry direction flags and, for shortcuts, a pointer to one of the two
//! edges they skip. Every node has a level which is 0 until the node is
//! contracted.
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::{Level, Weight};

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeIndex {
    fn from(ix: u32) -> Self {
        NodeIndex(ix)
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize,
)]
pub struct EdgeIndex(u32);

impl EdgeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// An invalid `EdgeIndex`, used to denote the absence of a skipped edge.
    #[inline]
    pub fn end() -> Self {
        EdgeIndex(u32::MAX)
    }
}

impl From<u32> for EdgeIndex {
    fn from(ix: u32) -> Self {
        EdgeIndex(ix)
    }
}

/// Allowed travel directions of an edge, relative to its stored orientation.
///
/// The graph only distinguishes the two canonical values [`EdgeFlags::FORWARD`]
/// and [`EdgeFlags::BIDIRECTIONAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EdgeFlags(u8);

impl EdgeFlags {
    /// Traversable from `source` to `target` only.
    pub const FORWARD: EdgeFlags = EdgeFlags(0b01);
    /// Traversable in both directions at the same weight.
    pub const BIDIRECTIONAL: EdgeFlags = EdgeFlags(0b11);

    #[inline]
    pub fn is_bidirectional(self) -> bool {
        self == EdgeFlags::BIDIRECTIONAL
    }

    /// Whether an edge carrying `existing` may be replaced in place by an
    /// edge carrying `new` without losing a travel direction, i.e. `new` is
    /// a superset of `existing`.
    #[inline]
    pub fn can_overwrite(existing: EdgeFlags, new: EdgeFlags) -> bool {
        existing.0 & new.0 == existing.0
    }
}

/// A weighted edge between `source` and `target`. Shortcut edges additionally
/// reference the incoming half of the two-edge path they replace via
/// `skipped`; the outgoing half is recoverable through [`LevelGraph::second_half`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: Weight,
    pub flags: EdgeFlags,
    pub skipped: EdgeIndex,
}

impl Edge {
    pub fn new(source: NodeIndex, target: NodeIndex, weight: Weight, flags: EdgeFlags) -> Self {
        Edge {
            source,
            target,
            weight,
            flags,
            skipped: EdgeIndex::end(),
        }
    }

    /// The endpoint opposite to `node`.
    #[inline]
    pub fn other(&self, node: NodeIndex) -> NodeIndex {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }

    #[inline]
    pub fn is_shortcut(&self) -> bool {
        self.skipped != EdgeIndex::end()
    }
}

/// A directed graph G = (V,E) stored as adjacency lists, with per-node levels.
#[derive(Clone, Serialize, Deserialize)]
pub struct LevelGraph {
    /// One incident-edge list per node; direction is resolved by the
    /// iterators from the edge flags.
    adj: Vec<Vec<EdgeIndex>>,
    levels: Vec<Level>,
    pub edges: Vec<Edge>,
    num_shortcuts: usize,
}

impl LevelGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self {
            adj: Vec::new(),
            levels: Vec::new(),
            edges: Vec::new(),
            num_shortcuts: 0,
        }
    }

    /// Creates a new empty graph with preallocated memory for `num_nodes`
    /// nodes and `num_edges` edges
    pub fn with_capacity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            adj: Vec::with_capacity(num_nodes),
            levels: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_edges),
            num_shortcuts: 0,
        }
    }

    /// Adds a new node to the graph
    pub fn add_node(&mut self) -> NodeIndex {
        let node_idx = NodeIndex::new(self.levels.len());
        self.adj.push(Vec::new());
        self.levels.push(0);
        node_idx
    }

    /// Adds `n` nodes and returns their indices.
    pub fn add_nodes(&mut self, n: usize) -> Vec<NodeIndex> {
        (0..n).map(|_| self.add_node()).collect()
    }

    /// Add a new edge to the graph.
    ///
    /// **Panics** if the weight is negative or not finite, if either endpoint
    /// does not exist, or on a self loop.
    ///
    /// Returns the index of the new edge. The index stays stable for the
    /// lifetime of the graph.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        weight: Weight,
        flags: EdgeFlags,
    ) -> EdgeIndex {
        assert!(
            weight.is_finite() && weight >= 0.0,
            "Edge must have a finite non-negative weight. Edge weight was {}",
            weight
        );
        assert!(
            from.index() < self.levels.len(),
            "Source node index ({}) does not exist",
            from.index()
        );
        assert!(
            to.index() < self.levels.len(),
            "Target node index ({}) does not exist",
            to.index()
        );
        assert!(from != to, "Self loops are not supported");

        let edge_idx = EdgeIndex::new(self.edges.len());
        assert!(
            EdgeIndex::end() != edge_idx,
            "Maximum number of edges exceeded"
        );

        self.adj[from.index()].push(edge_idx);
        self.adj[to.index()].push(edge_idx);
        self.edges.push(Edge::new(from, to, weight, flags));

        edge_idx
    }

    /// Marks `edge_idx` as a shortcut by recording the incoming half of the
    /// two-edge path it replaces.
    pub fn set_skipped(&mut self, edge_idx: EdgeIndex, skipped: EdgeIndex) {
        debug_assert!(!self.edges[edge_idx.index()].is_shortcut());
        self.edges[edge_idx.index()].skipped = skipped;
        self.num_shortcuts += 1;
    }

    #[inline]
    pub fn level(&self, node: NodeIndex) -> Level {
        self.levels[node.index()]
    }

    #[inline]
    pub fn set_level(&mut self, node: NodeIndex, level: Level) {
        self.levels[node.index()] = level;
    }

    pub fn num_nodes(&self) -> usize {
        self.levels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_shortcuts(&self) -> usize {
        self.num_shortcuts
    }

    /// Returns an iterator over all edges of the graph
    pub fn all_edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeIndex::new(i), e))
    }

    /// Returns an iterator over all edges incident to `node`, regardless of
    /// direction.
    pub fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.adj[node.index()]
            .iter()
            .map(|edge_idx| (*edge_idx, &self.edges[edge_idx.index()]))
    }

    /// Returns an iterator over all edges traversable away from `node`.
    pub fn neighbors_outgoing(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.incident_edges(node)
            .filter(move |(_, e)| e.source == node || e.flags.is_bidirectional())
    }

    /// Returns an iterator over all edges traversable towards `node`.
    pub fn neighbors_incoming(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.incident_edges(node)
            .filter(move |(_, e)| e.target == node || e.flags.is_bidirectional())
    }

    /// Number of edges incident to `node` in either direction.
    pub fn degree(&self, node: NodeIndex) -> usize {
        self.adj[node.index()].len()
    }

    /// Returns the outgoing half of the two-edge path a shortcut replaces.
    ///
    /// The half is matched among the via node's outgoing edges by the exact
    /// weight sum; if the participating edge was reduced after the shortcut
    /// was created, the lightest parallel edge is returned instead.
    pub fn second_half(&self, shortcut_idx: EdgeIndex) -> EdgeIndex {
        let e = &self.edges[shortcut_idx.index()];
        debug_assert!(e.is_shortcut());
        let first = &self.edges[e.skipped.index()];
        let via = first.other(e.source);

        let mut fallback = EdgeIndex::end();
        let mut fallback_weight = Weight::INFINITY;
        for (idx, half) in self.neighbors_outgoing(via) {
            if half.other(via) != e.target {
                continue;
            }
            if first.weight + half.weight == e.weight {
                return idx;
            }
            if half.weight < fallback_weight {
                fallback = idx;
                fallback_weight = half.weight;
            }
        }
        assert!(
            fallback != EdgeIndex::end(),
            "Shortcut {} has no outgoing half between {} and {}",
            shortcut_idx.index(),
            via.index(),
            e.target.index()
        );
        fallback
    }

    /// Recursively unpacks an edge traversed starting at `entered_at`,
    /// appending the underlying original edges to `out` in travel order.
    pub fn unpack_traversed(
        &self,
        edge_idx: EdgeIndex,
        entered_at: NodeIndex,
        out: &mut Vec<EdgeIndex>,
    ) {
        let e = &self.edges[edge_idx.index()];
        if !e.is_shortcut() {
            out.push(edge_idx);
            return;
        }
        let second = self.second_half(edge_idx);
        let via = self.edges[e.skipped.index()].other(e.source);
        if entered_at == e.source {
            self.unpack_traversed(e.skipped, e.source, out);
            self.unpack_traversed(second, via, out);
        } else {
            self.unpack_traversed(second, e.target, out);
            self.unpack_traversed(e.skipped, via, out);
        }
    }

    /// Writes the (possibly prepared) graph to `path`.
    pub fn encode(&self, path: impl Into<PathBuf>) -> anyhow::Result<usize> {
        let mut file = std::fs::File::create(path.into())?;
        let bytes_written =
            bincode::serde::encode_into_std_write(self, &mut file, bincode::config::standard())?;

        Ok(bytes_written)
    }

    /// Reads a graph previously written with [`LevelGraph::encode`].
    pub fn from_decode(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path).context("Failed to read file")?;
        let mut reader = std::io::BufReader::new(file);

        let graph = bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
            .context("Failed to decode file")?;

        Ok(graph)
    }
}

impl Default for LevelGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_adjacency() {
        let mut g = LevelGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();

        g.add_edge(a, b, 1.0, EdgeFlags::FORWARD);
        g.add_edge(b, c, 2.0, EdgeFlags::BIDIRECTIONAL);

        assert_eq!(g.neighbors_outgoing(a).count(), 1);
        assert_eq!(g.neighbors_incoming(a).count(), 0);

        // the bidirectional edge shows up in every direction of both endpoints
        assert_eq!(g.neighbors_outgoing(c).count(), 1);
        assert_eq!(g.neighbors_incoming(c).count(), 1);
        assert_eq!(g.neighbors_outgoing(b).count(), 1);
        assert_eq!(g.neighbors_incoming(b).count(), 2);

        assert_eq!(g.degree(b), 2);
    }

    #[test]
    fn can_overwrite_flags() {
        use EdgeFlags as F;
        assert!(F::can_overwrite(F::FORWARD, F::FORWARD));
        assert!(F::can_overwrite(F::FORWARD, F::BIDIRECTIONAL));
        assert!(F::can_overwrite(F::BIDIRECTIONAL, F::BIDIRECTIONAL));
        assert!(!F::can_overwrite(F::BIDIRECTIONAL, F::FORWARD));
    }

    #[test]
    fn skipped_edges_are_counted() {
        let mut g = LevelGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();

        let ab = g.add_edge(a, b, 1.0, EdgeFlags::FORWARD);
        g.add_edge(b, c, 1.0, EdgeFlags::FORWARD);
        let ac = g.add_edge(a, c, 2.0, EdgeFlags::FORWARD);

        assert_eq!(g.num_shortcuts(), 0);
        g.set_skipped(ac, ab);
        assert_eq!(g.num_shortcuts(), 1);
        assert!(g.edges[ac.index()].is_shortcut());
        assert!(!g.edges[ab.index()].is_shortcut());
    }

    #[test]
    fn second_half_matches_by_weight_sum() {
        let mut g = LevelGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();

        let ab = g.add_edge(a, b, 1.0, EdgeFlags::FORWARD);
        g.add_edge(b, c, 5.0, EdgeFlags::FORWARD);
        let bc = g.add_edge(b, c, 2.0, EdgeFlags::FORWARD);
        let ac = g.add_edge(a, c, 3.0, EdgeFlags::FORWARD);
        g.set_skipped(ac, ab);

        assert_eq!(g.second_half(ac), bc);
    }

    #[test]
    fn unpack_nested_shortcut() {
        // 0 -> 1 -> 2 -> 3 with shortcuts 0->2 and 0->3
        let mut g = LevelGraph::new();
        let n: Vec<_> = (0..4).map(|_| g.add_node()).collect();

        let e01 = g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
        let e12 = g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
        let e23 = g.add_edge(n[2], n[3], 1.0, EdgeFlags::FORWARD);
        let s02 = g.add_edge(n[0], n[2], 2.0, EdgeFlags::FORWARD);
        g.set_skipped(s02, e01);
        let s03 = g.add_edge(n[0], n[3], 3.0, EdgeFlags::FORWARD);
        g.set_skipped(s03, s02);

        let mut unpacked = Vec::new();
        g.unpack_traversed(s03, n[0], &mut unpacked);
        assert_eq!(unpacked, vec![e01, e12, e23]);
    }

    #[test]
    fn unpack_bidirectional_shortcut_reversed() {
        // 0 <-> 1 <-> 2 with a bidirectional shortcut 0 <-> 2
        let mut g = LevelGraph::new();
        let n: Vec<_> = (0..3).map(|_| g.add_node()).collect();

        let e01 = g.add_edge(n[0], n[1], 1.0, EdgeFlags::BIDIRECTIONAL);
        let e12 = g.add_edge(n[1], n[2], 1.0, EdgeFlags::BIDIRECTIONAL);
        let s02 = g.add_edge(n[0], n[2], 2.0, EdgeFlags::BIDIRECTIONAL);
        g.set_skipped(s02, e01);

        let mut unpacked = Vec::new();
        g.unpack_traversed(s02, n[0], &mut unpacked);
        assert_eq!(unpacked, vec![e01, e12]);

        unpacked.clear();
        g.unpack_traversed(s02, n[2], &mut unpacked);
        assert_eq!(unpacked, vec![e12, e01]);
    }

    #[test]
    fn encode_and_decode() {
        let mut g = LevelGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, b, 1.5, EdgeFlags::BIDIRECTIONAL);
        g.set_level(b, 1);

        let path = std::env::temp_dir().join("ch_prep_graph_roundtrip.bin");
        g.encode(&path).unwrap();
        let decoded = LevelGraph::from_decode(&path).unwrap();

        assert_eq!(decoded.num_nodes(), 2);
        assert_eq!(decoded.num_edges(), 1);
        assert_eq!(decoded.level(b), 1);
        assert_eq!(decoded.edges[0].weight, 1.5);
    }
}

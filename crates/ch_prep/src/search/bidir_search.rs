//! Bidirectional Dijkstra with exchangeable behavior. The differences
//! between the plain search and the search on a prepared hierarchy are
//! confined to three function-valued fields (edge filter, termination check,
//! edge unpacker) plus a weight inverter, so there is exactly one search
//! implementation.
use std::collections::BinaryHeap;

use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    constants::Weight,
    graph::{EdgeIndex, LevelGraph, NodeIndex},
    statistics::SearchStats,
};

use super::{dijkstra::Candidate, shortest_path::ShortestPath};

/// Decides whether the search may move from `from` across `edge_idx` to `to`.
pub type EdgeFilter = fn(&LevelGraph, EdgeIndex, NodeIndex, NodeIndex) -> bool;
/// Decides whether the search is done, given the cheapest open entry of each
/// direction (`None` when that direction has drained) and the best meeting
/// weight found so far.
pub type TerminationCheck = fn(Option<Weight>, Option<Weight>, Weight) -> bool;
/// Expands an edge traversed from the given node into original edges.
pub type EdgeUnpacker = fn(&LevelGraph, EdgeIndex, NodeIndex, &mut Vec<EdgeIndex>);
/// Maps the internal weight of the found path to the reported weight.
pub type WeightInverter = fn(Weight) -> Weight;

type NodeData = FxHashMap<NodeIndex, (Weight, Option<(EdgeIndex, NodeIndex)>)>;

pub struct BidirSearch<'a> {
    pub stats: SearchStats,
    g: &'a LevelGraph,

    edge_filter: EdgeFilter,
    terminate: TerminationCheck,
    unpack: EdgeUnpacker,
    invert_weight: WeightInverter,

    data_fwd: NodeData,
    data_bwd: NodeData,
    settled_fwd: FxHashSet<NodeIndex>,
    settled_bwd: FxHashSet<NodeIndex>,

    meet_node: Option<NodeIndex>,
    best_weight: Weight,
}

fn original_edges_only(g: &LevelGraph, edge_idx: EdgeIndex, _: NodeIndex, _: NodeIndex) -> bool {
    !g.edges[edge_idx.index()].is_shortcut()
}

fn upward_only(g: &LevelGraph, _: EdgeIndex, from: NodeIndex, to: NodeIndex) -> bool {
    g.level(to) > g.level(from)
}

// Plain bidirectional termination: no shorter meeting can exist once the two
// frontiers together exceed the best weight.
fn frontier_sum_bound(min_fwd: Option<Weight>, min_bwd: Option<Weight>, best: Weight) -> bool {
    match (min_fwd, min_bwd) {
        (Some(f), Some(b)) => f + b >= best,
        (Some(f), None) => f >= best,
        (None, Some(b)) => b >= best,
        (None, None) => true,
    }
}

// On a prepared hierarchy the searches run past each other, so each
// still-active direction has to be bounded by the best weight on its own.
fn frontier_each_bound(min_fwd: Option<Weight>, min_bwd: Option<Weight>, best: Weight) -> bool {
    min_fwd.map_or(true, |f| f >= best) && min_bwd.map_or(true, |b| b >= best)
}

fn push_original(_: &LevelGraph, edge_idx: EdgeIndex, _: NodeIndex, out: &mut Vec<EdgeIndex>) {
    out.push(edge_idx);
}

fn unpack_shortcuts(g: &LevelGraph, edge_idx: EdgeIndex, entered_at: NodeIndex, out: &mut Vec<EdgeIndex>) {
    g.unpack_traversed(edge_idx, entered_at, out);
}

fn identity(weight: Weight) -> Weight {
    weight
}

impl<'a> BidirSearch<'a> {
    /// A plain bidirectional Dijkstra over the original edges of `graph`.
    pub fn new(graph: &'a LevelGraph) -> Self {
        Self::with_hooks(graph, original_edges_only, frontier_sum_bound, push_original)
    }

    /// The search configuration for a graph prepared by contraction: both
    /// directions only climb in level, termination bounds each direction
    /// separately, and shortcut edges are unpacked in the result.
    pub fn prepared(graph: &'a LevelGraph) -> Self {
        Self::with_hooks(graph, upward_only, frontier_each_bound, unpack_shortcuts)
    }

    fn with_hooks(
        graph: &'a LevelGraph,
        edge_filter: EdgeFilter,
        terminate: TerminationCheck,
        unpack: EdgeUnpacker,
    ) -> Self {
        BidirSearch {
            stats: SearchStats::default(),
            g: graph,
            edge_filter,
            terminate,
            unpack,
            invert_weight: identity,
            data_fwd: FxHashMap::default(),
            data_bwd: FxHashMap::default(),
            settled_fwd: FxHashSet::default(),
            settled_bwd: FxHashSet::default(),
            meet_node: None,
            best_weight: Weight::INFINITY,
        }
    }

    /// Replaces the identity weight inversion, e.g. to report a travel time
    /// that the edge weights were derived from.
    pub fn with_weight_inverter(mut self, invert: WeightInverter) -> Self {
        self.invert_weight = invert;
        self
    }

    fn init(&mut self) {
        self.data_fwd.clear();
        self.data_bwd.clear();
        self.settled_fwd.clear();
        self.settled_bwd.clear();
        self.meet_node = None;
        self.best_weight = Weight::INFINITY;
        self.stats.init();
    }

    /// Finds the shortest path from `source` to `target`.
    pub fn search(&mut self, source: NodeIndex, target: NodeIndex) -> Option<ShortestPath> {
        self.init();

        if source.index() >= self.g.num_nodes() || target.index() >= self.g.num_nodes() {
            return None;
        }
        if source == target {
            self.stats.finish();
            return Some(ShortestPath::new(
                vec![source],
                vec![],
                (self.invert_weight)(0.0),
            ));
        }

        info!("BEGIN bidirectional search from {:?} to {:?}", source, target);

        let mut queue_fwd = BinaryHeap::new();
        let mut queue_bwd = BinaryHeap::new();
        queue_fwd.push(Candidate::new(source, 0.0));
        queue_bwd.push(Candidate::new(target, 0.0));
        self.data_fwd.insert(source, (0.0, None));
        self.data_bwd.insert(target, (0.0, None));

        loop {
            Self::drop_settled_heads(&mut queue_fwd, &self.settled_fwd);
            Self::drop_settled_heads(&mut queue_bwd, &self.settled_bwd);
            let min_fwd = queue_fwd.peek().map(|c| c.weight);
            let min_bwd = queue_bwd.peek().map(|c| c.weight);
            if (self.terminate)(min_fwd, min_bwd, self.best_weight) {
                break;
            }
            // advance the direction with the cheaper frontier
            match (min_fwd, min_bwd) {
                (Some(f), Some(b)) if f <= b => self.settle_fwd(&mut queue_fwd),
                (Some(_), None) => self.settle_fwd(&mut queue_fwd),
                (Some(_), Some(_)) | (None, Some(_)) => self.settle_bwd(&mut queue_bwd),
                (None, None) => break,
            }
        }

        self.stats.finish();
        debug!("Meeting node: {:?}, weight: {}", self.meet_node, self.best_weight);

        self.reconstruct(source)
    }

    fn drop_settled_heads(queue: &mut BinaryHeap<Candidate>, settled: &FxHashSet<NodeIndex>) {
        while let Some(head) = queue.peek() {
            if settled.contains(&head.node_idx) {
                queue.pop();
            } else {
                break;
            }
        }
    }

    fn settle_fwd(&mut self, queue: &mut BinaryHeap<Candidate>) {
        let Some(curr) = queue.pop() else { return };
        self.settled_fwd.insert(curr.node_idx);
        self.stats.nodes_settled += 1;

        for (edge_idx, edge) in self.g.neighbors_outgoing(curr.node_idx) {
            let next = edge.other(curr.node_idx);
            if !(self.edge_filter)(self.g, edge_idx, curr.node_idx, next) {
                continue;
            }
            let new_weight = curr.weight + edge.weight;
            if new_weight < self.data_fwd.get(&next).map_or(Weight::INFINITY, |d| d.0) {
                self.data_fwd
                    .insert(next, (new_weight, Some((edge_idx, curr.node_idx))));
                queue.push(Candidate::new(next, new_weight));

                if let Some(&(weight_bwd, _)) = self.data_bwd.get(&next) {
                    if new_weight + weight_bwd < self.best_weight {
                        self.best_weight = new_weight + weight_bwd;
                        self.meet_node = Some(next);
                    }
                }
            }
        }
    }

    fn settle_bwd(&mut self, queue: &mut BinaryHeap<Candidate>) {
        let Some(curr) = queue.pop() else { return };
        self.settled_bwd.insert(curr.node_idx);
        self.stats.nodes_settled += 1;

        for (edge_idx, edge) in self.g.neighbors_incoming(curr.node_idx) {
            let next = edge.other(curr.node_idx);
            // the reverse search also only climbs: the filter sees the
            // transition it makes, from the settled node to the new one
            if !(self.edge_filter)(self.g, edge_idx, curr.node_idx, next) {
                continue;
            }
            let new_weight = curr.weight + edge.weight;
            if new_weight < self.data_bwd.get(&next).map_or(Weight::INFINITY, |d| d.0) {
                self.data_bwd
                    .insert(next, (new_weight, Some((edge_idx, curr.node_idx))));
                queue.push(Candidate::new(next, new_weight));

                if let Some(&(weight_fwd, _)) = self.data_fwd.get(&next) {
                    if new_weight + weight_fwd < self.best_weight {
                        self.best_weight = new_weight + weight_fwd;
                        self.meet_node = Some(next);
                    }
                }
            }
        }
    }

    fn reconstruct(&self, source: NodeIndex) -> Option<ShortestPath> {
        let meet = self.meet_node?;

        let mut edges = Vec::new();

        // walk meet -> source, then unpack the hops in travel order
        let mut hops = Vec::new();
        let mut node = meet;
        while let Some((edge_idx, prev)) = self.data_fwd.get(&node).and_then(|d| d.1) {
            hops.push((edge_idx, prev));
            node = prev;
        }
        for &(edge_idx, from) in hops.iter().rev() {
            (self.unpack)(self.g, edge_idx, from, &mut edges);
        }

        // the backward chain meet -> target is already in travel order
        let mut node = meet;
        while let Some((edge_idx, next)) = self.data_bwd.get(&node).and_then(|d| d.1) {
            (self.unpack)(self.g, edge_idx, node, &mut edges);
            node = next;
        }

        let mut nodes = vec![source];
        let mut node = source;
        for edge_idx in &edges {
            node = self.g.edges[edge_idx.index()].other(node);
            nodes.push(node);
        }

        info!("{}, weight: {}", self.stats, self.best_weight);
        Some(ShortestPath::new(
            nodes,
            edges,
            (self.invert_weight)(self.best_weight),
        ))
    }
}

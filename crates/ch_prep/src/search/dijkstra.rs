//! Plain Dijkstra over the original edges of a graph. Serves as the
//! reference the prepared-graph searches are checked against.
use std::collections::BinaryHeap;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::constants::Weight;
use crate::graph::{EdgeIndex, LevelGraph, NodeIndex};
use crate::search::shortest_path::ShortestPath;
use crate::statistics::SearchStats;

#[derive(Debug)]
pub(crate) struct Candidate {
    pub(crate) node_idx: NodeIndex,
    pub(crate) weight: Weight,
}

impl Candidate {
    pub(crate) fn new(node_idx: NodeIndex, weight: Weight) -> Self {
        Self { node_idx, weight }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        other.weight.partial_cmp(&self.weight)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        other.weight == self.weight
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

pub struct Dijkstra<'a> {
    pub stats: SearchStats,
    g: &'a LevelGraph,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a LevelGraph) -> Self {
        Dijkstra {
            g: graph,
            stats: SearchStats::default(),
        }
    }

    pub fn search(&mut self, source: NodeIndex, target: NodeIndex) -> Option<ShortestPath> {
        self.stats.init();

        if source.index() >= self.g.num_nodes() || target.index() >= self.g.num_nodes() {
            return None;
        }
        if source == target {
            self.stats.finish();
            return Some(ShortestPath::new(vec![source], vec![], 0.0));
        }

        let mut node_data: FxHashMap<NodeIndex, (Weight, Option<(EdgeIndex, NodeIndex)>)> =
            FxHashMap::default();
        node_data.insert(source, (0.0, None));

        let mut queue = BinaryHeap::new();
        queue.push(Candidate::new(source, 0.0));

        let mut found = false;
        while let Some(Candidate { weight, node_idx }) = queue.pop() {
            self.stats.nodes_settled += 1;

            if node_idx == target {
                found = true;
                break;
            }

            for (edge_idx, edge) in self
                .g
                .neighbors_outgoing(node_idx)
                .filter(|(_, e)| !e.is_shortcut())
            {
                let next = edge.other(node_idx);
                let new_weight = weight + edge.weight;
                if new_weight < node_data.get(&next).map_or(Weight::INFINITY, |d| d.0) {
                    node_data.insert(next, (new_weight, Some((edge_idx, node_idx))));
                    queue.push(Candidate::new(next, new_weight));
                }
            }
        }
        self.stats.finish();

        if !found {
            info!("No path found, {}", self.stats);
            return None;
        }

        let weight = node_data[&target].0;
        let mut nodes = vec![target];
        let mut edges = Vec::new();
        let mut node = target;
        while let Some((edge_idx, prev)) = node_data[&node].1 {
            edges.push(edge_idx);
            nodes.push(prev);
            node = prev;
        }
        nodes.reverse();
        edges.reverse();

        debug!("Path found: {:?}", nodes);
        Some(ShortestPath::new(nodes, edges, weight))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{node_index, EdgeFlags};
    use crate::search::{assert_no_path, assert_path};

    use super::*;

    #[test]
    fn simple_path() {
        //      7 -> 8 -> 9
        //      |         |
        // 0 -> 5 -> 6 -  |
        // |         |  \ |
        // 1 -> 2 -> 3 -> 4
        let mut g = LevelGraph::new();
        let n = g.add_nodes(10);

        g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[2], n[3], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[3], n[4], 20.0, EdgeFlags::FORWARD);
        g.add_edge(n[0], n[5], 5.0, EdgeFlags::FORWARD);
        g.add_edge(n[5], n[6], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[6], n[4], 20.0, EdgeFlags::FORWARD);
        g.add_edge(n[6], n[3], 20.0, EdgeFlags::FORWARD);
        g.add_edge(n[5], n[7], 5.0, EdgeFlags::FORWARD);
        g.add_edge(n[7], n[8], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[8], n[9], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[9], n[4], 1.0, EdgeFlags::FORWARD);

        let mut d = Dijkstra::new(&g);

        assert_no_path(d.search(n[4], n[0])); // cannot be reached
        assert_path(vec![0, 5, 7, 8, 9, 4], 13.0, d.search(n[0], n[4]));
        assert_path(vec![6, 3], 20.0, d.search(n[6], n[3]));
        assert_path(vec![4], 0.0, d.search(n[4], n[4]));
        assert_path(vec![1, 2, 3, 4], 22.0, d.search(n[1], n[4]));
    }

    #[test]
    fn bidirectional_edges_work_both_ways() {
        // 0 <-> 1 <-> 2
        let mut g = LevelGraph::new();
        let n = g.add_nodes(3);
        g.add_edge(n[0], n[1], 1.0, EdgeFlags::BIDIRECTIONAL);
        g.add_edge(n[1], n[2], 2.0, EdgeFlags::BIDIRECTIONAL);

        let mut d = Dijkstra::new(&g);
        assert_path(vec![0, 1, 2], 3.0, d.search(n[0], n[2]));
        assert_path(vec![2, 1, 0], 3.0, d.search(n[2], n[0]));
    }

    #[test]
    fn shortcuts_are_ignored() {
        // 0 -> 1 -> 2 plus a prepared shortcut 0 -> 2
        let mut g = LevelGraph::new();
        let n = g.add_nodes(3);
        let e01 = g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
        let s02 = g.add_edge(n[0], n[2], 2.0, EdgeFlags::FORWARD);
        g.set_skipped(s02, e01);

        let mut d = Dijkstra::new(&g);
        let sp = d.search(n[0], n[2]).unwrap();
        assert_eq!(sp.nodes, vec![n[0], n[1], n[2]]);
        assert!(sp.edges.iter().all(|e| !g.edges[e.index()].is_shortcut()));
    }

    #[test]
    fn out_of_bounds_query() {
        let g = LevelGraph::new();
        let mut d = Dijkstra::new(&g);
        assert_no_path(d.search(node_index(0), node_index(0)));
    }
}

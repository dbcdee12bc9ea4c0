//! Bounded many-target shortest path search used to decide whether a
//! candidate shortcut is necessary.
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    constants::Weight,
    graph::{LevelGraph, NodeIndex},
    search::dijkstra::Candidate,
};

/// A target of the witness search together with the weight of the path
/// through the node being contracted, and a slot for the settled weight.
#[derive(Debug, Clone, Copy)]
pub struct WitnessGoal {
    pub target: NodeIndex,
    /// Weight of the two-edge path through the contraction candidate.
    pub via_weight: Weight,
    /// Original-edge count of the outgoing half behind this goal.
    pub originals: u32,
    pub settled: Option<Weight>,
}

impl WitnessGoal {
    pub fn new(target: NodeIndex, via_weight: Weight, originals: u32) -> Self {
        WitnessGoal {
            target,
            via_weight,
            originals,
            settled: None,
        }
    }
}

/// Single-source search towards a set of goals that never visits the avoided
/// node or any contracted node, and stops once the frontier exceeds the
/// weight limit. The scratch state is owned here and reused across
/// invocations.
pub struct WitnessSearch {
    heap: BinaryHeap<Candidate>,
    data: FxHashMap<NodeIndex, (Weight, Option<NodeIndex>)>,
    settled: FxHashSet<NodeIndex>,
}

impl WitnessSearch {
    pub fn new() -> Self {
        WitnessSearch {
            heap: BinaryHeap::new(),
            data: FxHashMap::default(),
            settled: FxHashSet::default(),
        }
    }

    /// Runs the search from `source`, settling nodes in non-decreasing
    /// weight order until every goal is settled or the cheapest open entry
    /// exceeds `limit`. Each settled goal's slot receives its shortest path
    /// weight.
    pub fn run(
        &mut self,
        g: &LevelGraph,
        source: NodeIndex,
        avoid: NodeIndex,
        limit: Weight,
        goals: &mut [WitnessGoal],
    ) {
        debug_assert_ne!(source, avoid, "search must not start on the avoided node");

        self.heap.clear();
        self.data.clear();
        self.settled.clear();
        for goal in goals.iter_mut() {
            goal.settled = None;
        }
        let mut remaining = goals.len();

        self.data.insert(source, (0.0, None));
        self.heap.push(Candidate::new(source, 0.0));

        while let Some(Candidate { node_idx, weight }) = self.heap.pop() {
            if self.settled.contains(&node_idx) {
                continue;
            }
            if weight > limit {
                break;
            }
            self.settled.insert(node_idx);

            for goal in goals.iter_mut() {
                if goal.target == node_idx && goal.settled.is_none() {
                    goal.settled = Some(weight);
                    remaining -= 1;
                }
            }
            if remaining == 0 {
                break;
            }

            for (_, edge) in g.neighbors_outgoing(node_idx) {
                let next = edge.other(node_idx);
                if next == avoid || g.level(next) != 0 {
                    continue;
                }
                let new_weight = weight + edge.weight;
                if new_weight < self.data.get(&next).map_or(Weight::INFINITY, |d| d.0) {
                    self.data.insert(next, (new_weight, Some(node_idx)));
                    self.heap.push(Candidate::new(next, new_weight));
                }
            }
        }
    }

    /// Reconstructs the witness path to a settled node from the state of the
    /// last `run`, returning the node sequence and the found weight.
    pub fn path_to(&self, target: NodeIndex) -> Option<(Vec<NodeIndex>, Weight)> {
        if !self.settled.contains(&target) {
            return None;
        }
        let weight = self.data.get(&target)?.0;
        let mut path = vec![target];
        let mut node = target;
        while let Some(prev) = self.data.get(&node)?.1 {
            path.push(prev);
            node = prev;
        }
        path.reverse();
        Some((path, weight))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{node_index, EdgeFlags};

    use super::*;

    fn goal_weight(goals: &[WitnessGoal], target: NodeIndex) -> Option<Weight> {
        goals.iter().find(|g| g.target == target)?.settled
    }

    #[test]
    fn avoids_node() {
        // 0 -> 1 -> 2
        // |         |
        // 3 -> 4 -> 5
        let mut g = LevelGraph::new();
        let n = g.add_nodes(6);
        g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[0], n[3], 10.0, EdgeFlags::FORWARD);
        g.add_edge(n[3], n[4], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[4], n[5], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[5], n[2], 1.0, EdgeFlags::FORWARD);

        let mut ws = WitnessSearch::new();
        let mut goals = vec![WitnessGoal::new(n[2], 13.0, 1)];
        ws.run(&g, n[0], n[1], 13.0, &mut goals);
        assert_eq!(goal_weight(&goals, n[2]), Some(13.0));

        let (path, weight) = ws.path_to(n[2]).unwrap();
        assert_eq!(weight, 13.0);
        assert_eq!(path, vec![n[0], n[3], n[4], n[5], n[2]]);
    }

    #[test]
    fn stops_at_weight_limit() {
        // 0 -> 1 -> 2 -> 3 -> 4
        let mut g = LevelGraph::new();
        let n = g.add_nodes(5);
        for i in 0..4 {
            g.add_edge(n[i], n[i + 1], 1.0, EdgeFlags::FORWARD);
        }

        let mut ws = WitnessSearch::new();
        let mut goals = vec![WitnessGoal::new(n[4], 4.0, 1)];
        ws.run(&g, n[0], n[2], 4.0, &mut goals);
        // node 2 is avoided, so node 4 is unreachable
        assert_eq!(goal_weight(&goals, n[4]), None);

        let mut goals = vec![WitnessGoal::new(n[3], 3.0, 1)];
        ws.run(&g, n[0], node_index(100), 2.0, &mut goals);
        // reachable, but beyond the limit
        assert_eq!(goal_weight(&goals, n[3]), None);
    }

    #[test]
    fn skips_contracted_nodes() {
        // 0 -> 1 -> 2, with 1 already contracted
        let mut g = LevelGraph::new();
        let n = g.add_nodes(3);
        g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
        g.set_level(n[1], 1);

        let mut ws = WitnessSearch::new();
        let mut goals = vec![WitnessGoal::new(n[2], 2.0, 1)];
        ws.run(&g, n[0], node_index(100), 10.0, &mut goals);
        assert_eq!(goal_weight(&goals, n[2]), None);
    }

    #[test]
    fn settles_multiple_goals() {
        // 0 -> 1, 0 -> 2 -> 3
        let mut g = LevelGraph::new();
        let n = g.add_nodes(4);
        g.add_edge(n[0], n[1], 2.0, EdgeFlags::FORWARD);
        g.add_edge(n[0], n[2], 1.0, EdgeFlags::FORWARD);
        g.add_edge(n[2], n[3], 1.0, EdgeFlags::FORWARD);

        let mut ws = WitnessSearch::new();
        let mut goals = vec![
            WitnessGoal::new(n[1], 5.0, 1),
            WitnessGoal::new(n[3], 5.0, 1),
        ];
        ws.run(&g, n[0], node_index(100), 5.0, &mut goals);
        assert_eq!(goal_weight(&goals, n[1]), Some(2.0));
        assert_eq!(goal_weight(&goals, n[3]), Some(2.0));
    }
}

//! Preparation of a [`LevelGraph`] for fast shortest path queries.
//!
//! Nodes are contracted one by one in ascending priority order. Contracting
//! a node assigns it the next level and inserts the shortcuts needed to
//! preserve every shortest path that ran through it.
//!
//! # Examples
//! ```
//! use ch_prep::prelude::*;
//!
//! let mut g = generate_simple_graph();
//!
//! let mut contractor = NodeContractor::new(&mut g);
//! contractor.run();
//!
//! let mut algo = contractor.create_algo();
//! let path = algo.search(node_index(4), node_index(1)).unwrap();
//! assert_eq!(path.weight, 3.0);
//! ```
//!
//! [`LevelGraph`]: crate::graph::LevelGraph
use std::cmp::max;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::{
    constants::Weight,
    contraction_params::PriorityParams,
    graph::{node_index, EdgeFlags, EdgeIndex, LevelGraph, NodeIndex},
    node_queue::NodeQueue,
    original_edges::OriginalEdges,
    search::bidir_search::BidirSearch,
    statistics::ConstructionStats,
    witness_search::{WitnessGoal, WitnessSearch},
};

/// A shortcut found by the synthesis step, not yet materialised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Shortcut {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight: Weight,
    pub flags: EdgeFlags,
    /// The incoming half of the two-edge path the shortcut replaces.
    pub skipped: EdgeIndex,
    /// Number of original edges the shortcut stands in for.
    pub originals: u32,
}

fn push_candidate(shortcuts: &mut Vec<Shortcut>, candidate: Shortcut) {
    for existing in shortcuts.iter_mut() {
        if existing.from == candidate.from
            && existing.to == candidate.to
            && existing.weight == candidate.weight
        {
            return;
        }
        // the mirrored candidate with the identical weight folds into a
        // single bidirectional shortcut
        if existing.from == candidate.to
            && existing.to == candidate.from
            && existing.weight == candidate.weight
        {
            existing.flags = EdgeFlags::BIDIRECTIONAL;
            return;
        }
    }
    shortcuts.push(candidate);
}

/// Contracts the nodes of a borrowed [`LevelGraph`].
///
/// The contractor owns the original-edge counts, the node priority queue and
/// the witness search scratch; the graph is only mutated by shortcut
/// insertion and level assignment. Once [`run`] has completed, shortest path
/// queries on the prepared graph are served by the executor returned from
/// [`create_algo`].
///
/// [`run`]: NodeContractor::run
/// [`create_algo`]: NodeContractor::create_algo
pub struct NodeContractor<'a> {
    g: &'a mut LevelGraph,
    originals: OriginalEdges,
    queue: NodeQueue,
    cached_priorities: Vec<i32>,
    witness: WitnessSearch,
    /// Shortcut candidates of the most recent `find_shortcuts` call.
    shortcuts: Vec<Shortcut>,
    goals: Vec<WitnessGoal>,
    next_level: usize,
    prepared: bool,
    params: PriorityParams,
    stats: ConstructionStats,
}

impl<'a> NodeContractor<'a> {
    pub fn new(g: &'a mut LevelGraph) -> Self {
        Self::new_with_params(g, PriorityParams::default())
    }

    pub fn new_with_params(g: &'a mut LevelGraph, params: PriorityParams) -> Self {
        let num_nodes = g.num_nodes();
        let num_edges = g.num_edges();
        NodeContractor {
            g,
            originals: OriginalEdges::with_capacity(num_edges * 2),
            queue: NodeQueue::new(),
            cached_priorities: vec![0; num_nodes],
            witness: WitnessSearch::new(),
            shortcuts: Vec::new(),
            goals: Vec::new(),
            next_level: 1,
            prepared: false,
            params,
            stats: ConstructionStats::default(),
        }
    }

    /// Runs edge preparation, the initial node ordering and the contraction
    /// loop. Calling this a second time on the same instance is a no-op.
    pub fn run(&mut self) {
        if self.prepared {
            return;
        }
        self.prepared = true;
        self.stats.init();

        info!("BEGIN preparing graph");
        self.prepare_edges();
        if self.g.num_edges() == 0 {
            info!("Graph has no edges, nothing to contract");
            return;
        }

        info!("Calculating initial node order...");
        for v in 0..self.g.num_nodes() {
            let v = node_index(v);
            let priority = self.calc_priority(v);
            self.cached_priorities[v.index()] = priority;
            self.queue.insert(v, priority);
        }
        self.stats.stop_timer_node_ordering();

        let update_interval = max(10, self.queue.len() / 10);
        let mut update_epoch = 0usize;
        let mut step = 0usize;

        let pb = ProgressBar::new(self.queue.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} nodes",
            )
            .unwrap()
            .progress_chars("#>-"),
        );

        while !self.queue.is_empty() {
            if step % update_interval == 0 {
                if update_epoch > 0 && update_epoch % 2 == 0 {
                    debug!("Refreshing the priorities of all queued nodes");
                    for v in 0..self.g.num_nodes() {
                        let v = node_index(v);
                        if self.g.level(v) != 0 {
                            continue;
                        }
                        let old = self.cached_priorities[v.index()];
                        let new = self.calc_priority(v);
                        self.queue.update(v, old, new);
                        self.cached_priorities[v.index()] = new;
                    }
                }
                update_epoch += 1;
            }
            step += 1;

            let v = match self.queue.poll_min_key() {
                Some(v) => v,
                None => break,
            };

            // lazy revalidation: contract v only if it still is a minimum
            let priority = self.calc_priority(v);
            if let Some(min_priority) = self.queue.peek_min_priority() {
                if priority > min_priority {
                    self.queue.insert(v, priority);
                    self.cached_priorities[v.index()] = priority;
                    continue;
                }
            }

            debug!("=> Contracting node: {}", v.index());
            let added = self.add_shortcuts(v);
            self.stats.shortcuts_added += added;

            self.g.set_level(v, self.next_level);
            self.next_level += 1;

            let neighbors: FxHashSet<NodeIndex> = self
                .g
                .incident_edges(v)
                .map(|(_, e)| e.other(v))
                .filter(|&n| self.g.level(n) == 0)
                .collect();
            for n in neighbors {
                let old = self.cached_priorities[n.index()];
                let new = self.calc_priority(n);
                if new != old {
                    self.queue.update(n, old, new);
                    self.cached_priorities[n.index()] = new;
                }
            }
            pb.inc(1);
        }
        self.stats.stop_timer_contraction();
        pb.finish_and_clear();

        info!(
            "FINISHED contracting, {} shortcuts added",
            self.stats.shortcuts_added
        );
        debug!("{:?}", self.stats);
    }

    /// Returns a query executor configured for the prepared graph.
    pub fn create_algo(&self) -> BidirSearch<'_> {
        BidirSearch::prepared(self.g)
    }

    /// The borrowed graph.
    pub fn graph(&self) -> &LevelGraph {
        self.g
    }

    pub fn stats(&self) -> ConstructionStats {
        self.stats
    }

    // Every input edge stands in for itself.
    fn prepare_edges(&mut self) {
        for edge_idx in 0..self.g.num_edges() {
            self.originals.set(EdgeIndex::new(edge_idx), 1);
        }
    }

    /// Computes the shortcuts needed to bypass `v` without mutating the
    /// graph. The candidates are left in the reused scratch buffer; their
    /// number is returned.
    ///
    /// For every uncontracted incoming neighbor u, a witness search decides
    /// which outgoing neighbors w can already be reached on a path that
    /// avoids v with no more weight than the path through v; those shortcuts
    /// are suppressed.
    fn find_shortcuts(&mut self, v: NodeIndex) -> usize {
        self.shortcuts.clear();

        let edges_in: Vec<(EdgeIndex, NodeIndex, Weight)> = self
            .g
            .neighbors_incoming(v)
            .map(|(idx, e)| (idx, e.other(v), e.weight))
            .filter(|&(_, u, _)| self.g.level(u) == 0)
            .collect();
        let edges_out: Vec<(EdgeIndex, NodeIndex, Weight)> = self
            .g
            .neighbors_outgoing(v)
            .map(|(idx, e)| (idx, e.other(v), e.weight))
            .filter(|&(_, w, _)| self.g.level(w) == 0)
            .collect();

        for &(uv_idx, u, weight_uv) in &edges_in {
            self.goals.clear();
            let mut limit: Weight = 0.0;
            for &(vw_idx, w, weight_vw) in &edges_out {
                if w == u {
                    continue;
                }
                let via_weight = weight_uv + weight_vw;
                limit = limit.max(via_weight);
                self.goals
                    .push(WitnessGoal::new(w, via_weight, self.originals.get(vw_idx)));
            }
            if self.goals.is_empty() {
                continue;
            }

            self.witness.run(&*self.g, u, v, limit, &mut self.goals);

            let originals_uv = self.originals.get(uv_idx);
            for goal in &self.goals {
                if let Some(found) = goal.settled {
                    // an equally good path around v makes the shortcut
                    // redundant
                    if found <= goal.via_weight {
                        continue;
                    }
                }
                push_candidate(
                    &mut self.shortcuts,
                    Shortcut {
                        from: u,
                        to: goal.target,
                        weight: goal.via_weight,
                        flags: EdgeFlags::FORWARD,
                        skipped: uv_idx,
                        originals: originals_uv + goal.originals,
                    },
                );
            }
        }
        self.shortcuts.len()
    }

    /// Materialises the shortcuts for `v` into the graph. An existing
    /// shortcut between the same endpoints is updated in place when its
    /// flags allow it and its weight is worse; everything else becomes a new
    /// edge. Returns the number of newly inserted edges.
    fn add_shortcuts(&mut self, v: NodeIndex) -> usize {
        self.find_shortcuts(v);
        let shortcuts = std::mem::take(&mut self.shortcuts);

        let mut added = 0;
        for s in &shortcuts {
            let existing = self
                .g
                .neighbors_outgoing(s.from)
                .find(|(_, e)| {
                    e.source == s.from
                        && e.target == s.to
                        && e.is_shortcut()
                        && EdgeFlags::can_overwrite(e.flags, s.flags)
                        && e.weight > s.weight
                })
                .map(|(idx, _)| idx);

            if let Some(edge_idx) = existing {
                let edge = &mut self.g.edges[edge_idx.index()];
                edge.weight = s.weight;
                edge.flags = s.flags;
                edge.skipped = s.skipped;
                self.originals.set(edge_idx, s.originals);
            } else {
                let edge_idx = self.g.add_edge(s.from, s.to, s.weight, s.flags);
                self.g.set_skipped(edge_idx, s.skipped);
                self.originals.set(edge_idx, s.originals);
                added += 1;
            }
        }

        self.shortcuts = shortcuts;
        added
    }

    /// Priority of an uncontracted node; lower values are contracted
    /// earlier. Independent of the node's own level, otherwise the lazy
    /// revalidation in the driver could demote forever.
    fn calc_priority(&mut self, v: NodeIndex) -> i32 {
        let num_shortcuts = self.find_shortcuts(v) as i32;
        let edge_difference = num_shortcuts - self.g.degree(v) as i32;
        let sum_originals: u32 = self.shortcuts.iter().map(|s| s.originals).sum();
        let contracted_neighbors = self
            .g
            .incident_edges(v)
            .filter(|(_, e)| e.is_shortcut())
            .count() as i32;

        edge_difference * self.params.edge_difference_coeff
            + sum_originals as i32 * self.params.original_edges_coeff
            + contracted_neighbors * self.params.contracted_neighbors_coeff
    }
}

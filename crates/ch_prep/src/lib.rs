//! Crate to prepare a road network for fast shortest path queries with
//! contraction hierarchies.
//!
//! The graph is augmented with shortcut edges and every node is assigned a
//! level; a bidirectional search that only climbs in level then answers
//! queries while visiting a small fraction of the graph.
//!
//! # Basic usage
//! ```
//! use ch_prep::prelude::*;
//!
//! // Build a graph
//! let mut g = LevelGraph::new();
//! let a = g.add_node();
//! let b = g.add_node();
//! let c = g.add_node();
//! g.add_edge(a, b, 1.0, EdgeFlags::FORWARD);
//! g.add_edge(b, c, 1.0, EdgeFlags::BIDIRECTIONAL);
//!
//! // Run the contraction
//! let mut contractor = NodeContractor::new(&mut g);
//! contractor.run();
//!
//! // Query the prepared graph
//! let mut algo = contractor.create_algo();
//! let path = algo.search(a, c).unwrap();
//! assert_eq!(path.weight, 2.0);
//! ```
pub mod constants;
pub mod contraction_params;
pub mod graph;
pub mod node_contraction;
pub mod original_edges;
pub mod prelude;
pub mod search;
pub mod statistics;
pub mod util;
pub mod witness_search;

pub(crate) mod node_queue;

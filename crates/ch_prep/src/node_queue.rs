//! Priority queue of uncontracted nodes. Lower priority is contracted
//! earlier; ties are broken by ascending node id so that preparation is
//! deterministic.
use std::cmp::Reverse;

use priority_queue::PriorityQueue;

use crate::graph::NodeIndex;

pub(crate) struct NodeQueue {
    // `PriorityQueue` pops the maximum, so priorities are stored reversed,
    // with the node id as tie-break.
    queue: PriorityQueue<NodeIndex, Reverse<(i32, NodeIndex)>>,
}

impl NodeQueue {
    pub fn new() -> Self {
        NodeQueue {
            queue: PriorityQueue::new(),
        }
    }

    pub fn insert(&mut self, node: NodeIndex, priority: i32) {
        self.queue.push(node, Reverse((priority, node)));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Removes and returns the node with the lowest priority.
    pub fn poll_min_key(&mut self) -> Option<NodeIndex> {
        self.queue.pop().map(|(node, _)| node)
    }

    /// The lowest priority currently queued.
    pub fn peek_min_priority(&self) -> Option<i32> {
        self.queue.peek().map(|(_, Reverse((priority, _)))| *priority)
    }

    pub fn update(&mut self, node: NodeIndex, old: i32, new: i32) {
        debug_assert_eq!(
            self.queue.get_priority(&node),
            Some(&Reverse((old, node))),
            "stale priority for node {}",
            node.index()
        );
        if old == new {
            return;
        }
        self.queue.change_priority(&node, Reverse((new, node)));
    }
}

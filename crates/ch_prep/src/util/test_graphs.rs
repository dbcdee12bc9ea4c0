//! Small graphs shared by tests and examples.
use crate::graph::{EdgeFlags, LevelGraph};

/// A -> B -> C plus a direct A -> C that is more expensive than the detour.
pub fn triangle_graph() -> LevelGraph {
    let mut g = LevelGraph::new();
    let n = g.add_nodes(3);
    g.add_edge(n[0], n[1], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[1], n[2], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[0], n[2], 3.0, EdgeFlags::FORWARD);
    g
}

/// A -> B -> C bypassed by the much cheaper A -> D -> C.
pub fn witness_graph() -> LevelGraph {
    let mut g = LevelGraph::new();
    let n = g.add_nodes(4);
    g.add_edge(n[0], n[1], 5.0, EdgeFlags::FORWARD);
    g.add_edge(n[1], n[2], 5.0, EdgeFlags::FORWARD);
    g.add_edge(n[0], n[3], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[3], n[2], 1.0, EdgeFlags::FORWARD);
    g
}

/// A <-> B <-> C with unit weights.
pub fn bidirectional_chain() -> LevelGraph {
    let mut g = LevelGraph::new();
    let n = g.add_nodes(3);
    g.add_edge(n[0], n[1], 1.0, EdgeFlags::BIDIRECTIONAL);
    g.add_edge(n[1], n[2], 1.0, EdgeFlags::BIDIRECTIONAL);
    g
}

pub fn generate_simple_graph() -> LevelGraph {
    //           B
    //           |
    // E -> A -> C
    //      |  /
    //      D
    let mut g = LevelGraph::new();
    let n = g.add_nodes(5);

    g.add_edge(n[0], n[2], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[0], n[3], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[4], n[0], 1.0, EdgeFlags::FORWARD);
    g.add_edge(n[2], n[1], 1.0, EdgeFlags::BIDIRECTIONAL);
    g.add_edge(n[2], n[3], 1.0, EdgeFlags::BIDIRECTIONAL);

    g
}

pub fn generate_complex_graph() -> LevelGraph {
    let mut g = LevelGraph::new();

    // 'A'..='K'
    let n = g.add_nodes(11);

    g.add_edge(n[0], n[1], 3.0, EdgeFlags::BIDIRECTIONAL); // A <=> B
    g.add_edge(n[0], n[2], 5.0, EdgeFlags::BIDIRECTIONAL); // A <=> C
    g.add_edge(n[0], n[10], 3.0, EdgeFlags::BIDIRECTIONAL); // A <=> K

    g.add_edge(n[1], n[3], 5.0, EdgeFlags::BIDIRECTIONAL); // B <=> D
    g.add_edge(n[1], n[2], 3.0, EdgeFlags::BIDIRECTIONAL); // B <=> C

    g.add_edge(n[2], n[3], 2.0, EdgeFlags::BIDIRECTIONAL); // C <=> D
    g.add_edge(n[2], n[9], 2.0, EdgeFlags::BIDIRECTIONAL); // C <=> J

    g.add_edge(n[3], n[9], 4.0, EdgeFlags::BIDIRECTIONAL); // D <=> J
    g.add_edge(n[3], n[4], 7.0, EdgeFlags::BIDIRECTIONAL); // D <=> E

    g.add_edge(n[4], n[9], 3.0, EdgeFlags::BIDIRECTIONAL); // E <=> J
    g.add_edge(n[4], n[5], 6.0, EdgeFlags::BIDIRECTIONAL); // E <=> F

    g.add_edge(n[5], n[7], 2.0, EdgeFlags::BIDIRECTIONAL); // F <=> H
    g.add_edge(n[5], n[6], 4.0, EdgeFlags::BIDIRECTIONAL); // F <=> G

    g.add_edge(n[6], n[7], 3.0, EdgeFlags::BIDIRECTIONAL); // G <=> H
    g.add_edge(n[6], n[8], 5.0, EdgeFlags::BIDIRECTIONAL); // G <=> I

    g.add_edge(n[7], n[8], 3.0, EdgeFlags::BIDIRECTIONAL); // H <=> I
    g.add_edge(n[7], n[9], 2.0, EdgeFlags::BIDIRECTIONAL); // H <=> J

    g.add_edge(n[8], n[9], 4.0, EdgeFlags::BIDIRECTIONAL); // I <=> J
    g.add_edge(n[8], n[10], 6.0, EdgeFlags::BIDIRECTIONAL); // I <=> K

    g.add_edge(n[9], n[10], 3.0, EdgeFlags::BIDIRECTIONAL); // J <=> K

    g
}

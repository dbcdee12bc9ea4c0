//! Statistics module. Used to collect timings of preparation and search.
use std::{
    fmt::Display,
    time::{Duration, Instant},
};

/// Collects statistics about a search run.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Nodes settled by the search algorithm.
    pub nodes_settled: usize,
    /// Duration of the search.
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl SearchStats {
    /// Resets the statistics.
    pub fn init(&mut self) {
        self.nodes_settled = 0;
        self.start_time = Some(Instant::now());
    }

    /// Stops the timer.
    pub fn finish(&mut self) {
        if let Some(start_time) = self.start_time {
            self.duration = Some(start_time.elapsed());
        }
    }
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stats: {} nodes settled in {:?}",
            self.nodes_settled, self.duration
        )
    }
}

/// Collects statistics about the contraction run.
#[derive(Debug, Clone, Copy)]
pub struct ConstructionStats {
    pub node_ordering_time: Duration,
    pub contraction_time: Duration,
    pub total_time: Duration,
    pub shortcuts_added: usize,
    timer: Instant,
}

impl Default for ConstructionStats {
    fn default() -> Self {
        ConstructionStats {
            node_ordering_time: Duration::new(0, 0),
            contraction_time: Duration::new(0, 0),
            total_time: Duration::new(0, 0),
            shortcuts_added: 0,
            timer: Instant::now(),
        }
    }
}

impl Display for ConstructionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "---Construction Stats---")?;
        writeln!(f, "Node Ordering      : {:?}", self.node_ordering_time)?;
        writeln!(f, "Contraction        : {:?}", self.contraction_time)?;
        writeln!(f, "------------------------")?;
        writeln!(f, "Total time         : {:?}", self.total_time)?;
        writeln!(f, "Shortcuts added [#]: {}", self.shortcuts_added)
    }
}

impl ConstructionStats {
    pub(crate) fn init(&mut self) {
        self.timer = Instant::now();
        self.shortcuts_added = 0;
        self.node_ordering_time = Duration::new(0, 0);
        self.contraction_time = Duration::new(0, 0);
        self.total_time = Duration::new(0, 0);
    }

    pub(crate) fn stop_timer_node_ordering(&mut self) {
        self.node_ordering_time = self.timer.elapsed();
        self.total_time += self.node_ordering_time;
        self.timer = Instant::now();
    }

    pub(crate) fn stop_timer_contraction(&mut self) {
        self.contraction_time = self.timer.elapsed();
        self.total_time += self.contraction_time;
        self.timer = Instant::now();
    }
}

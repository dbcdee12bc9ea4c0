//! Parameters for the contraction algorithm

/// Coefficients for the priority function
///
/// ```text
/// P(v) = edge_difference_coeff * (shortcuts - degree)
///      + original_edges_coeff * sum of original-edge counts
///      + contracted_neighbors_coeff * shortcut-bearing incident edges
/// ```
///
/// The defaults weight the original-edge term heavily, which keeps the
/// number of materialised shortcuts small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityParams {
    pub edge_difference_coeff: i32,
    pub original_edges_coeff: i32,
    pub contracted_neighbors_coeff: i32,
}

impl PriorityParams {
    pub fn new(
        edge_difference_coeff: i32,
        original_edges_coeff: i32,
        contracted_neighbors_coeff: i32,
    ) -> Self {
        PriorityParams {
            edge_difference_coeff,
            original_edges_coeff,
            contracted_neighbors_coeff,
        }
    }

    pub fn edge_difference_coeff(mut self, coeff: i32) -> Self {
        self.edge_difference_coeff = coeff;
        self
    }

    pub fn original_edges_coeff(mut self, coeff: i32) -> Self {
        self.original_edges_coeff = coeff;
        self
    }

    pub fn contracted_neighbors_coeff(mut self, coeff: i32) -> Self {
        self.contracted_neighbors_coeff = coeff;
        self
    }
}

impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            edge_difference_coeff: 10,
            original_edges_coeff: 50,
            contracted_neighbors_coeff: 1,
        }
    }
}

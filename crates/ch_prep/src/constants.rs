/// Edge weight type
pub type Weight = f64;
/// Node level type. Level 0 marks an uncontracted node.
pub type Level = usize;

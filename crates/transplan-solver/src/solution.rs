/// The result of a successful solve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal flow per (supplier, customer) pair, including any synthetic
    /// row or column appended during balancing.
    pub allocation: Vec<Vec<f64>>,
    /// Total transportation cost of the allocation.
    pub objective: f64,
    /// Number of pivots performed after the start plan.
    pub iterations: usize,
    /// The last allocation row belongs to a free dummy supplier.
    pub has_dummy_row: bool,
    /// The last allocation column belongs to a free dummy customer.
    pub has_dummy_column: bool,
}

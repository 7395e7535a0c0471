use thiserror::Error;

/// Errors raised while building or solving a transportation problem.
///
/// The first two variants are input errors and can be reported to the
/// caller as-is. The remaining ones indicate a broken solver invariant or
/// an instance the pivot loop could not close out; retrying the same input
/// reproduces the same failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("negative {what} at index {index}: {value}")]
    NegativeCapacity {
        what: &'static str,
        index: usize,
        value: f64,
    },

    /// Potential propagation stalled because the basic cells do not span
    /// the problem graph. Points at broken degeneracy repair, not at the
    /// input.
    #[error("basis graph is disconnected, potentials cannot be computed")]
    DisconnectedBasis,

    /// No alternating cycle of basic cells closes through the entering
    /// cell.
    #[error("no reallocation cycle closes through cell ({row}, {col})")]
    NoImprovingCycle { row: usize, col: usize },

    /// The pivot loop hit its iteration bound before reaching optimality.
    #[error("plan did not reach optimality after {iterations} pivots")]
    NoConvergence { iterations: usize },
}

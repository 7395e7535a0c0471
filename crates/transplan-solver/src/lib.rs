mod error;
mod plan;
mod problem;
mod solution;
mod solver;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::SolveError;
pub use plan::StartMethod;
#[cfg(feature = "serde")]
pub use problem::SolveRequest;
pub use problem::{Penalties, TransportProblem};
pub use solution::Solution;
pub use solver::Solver;

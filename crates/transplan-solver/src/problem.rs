use crate::error::SolveError;
#[cfg(feature = "serde")]
use crate::plan::StartMethod;

/// Per-unit cost charged for routing flow through a synthetic node.
///
/// `row` holds one entry per supplier and prices the column of a dummy
/// customer; `column` holds one entry per customer and prices the row of a
/// dummy supplier. All-zero vectors (the default) make the synthetic
/// capacity free to use.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Penalties {
    pub row: Vec<f64>,
    pub column: Vec<f64>,
}

impl Penalties {
    /// Zero penalties for `m` suppliers and `n` customers.
    pub fn free(m: usize, n: usize) -> Self {
        Self {
            row: vec![0.0; m],
            column: vec![0.0; n],
        }
    }
}

/// A transportation problem: `m` suppliers with capacities, `n` customers
/// with requirements, and an `m x n` matrix of per-unit shipping costs.
///
/// Balancing mutates the problem in place by appending one synthetic row
/// or column, so each solve call works on its own instance.
#[derive(Debug, Clone)]
pub struct TransportProblem {
    supply: Vec<f64>,
    demand: Vec<f64>,
    costs: Vec<Vec<f64>>,
    penalties: Penalties,
    has_dummy_row: bool,
    has_dummy_column: bool,
}

impl TransportProblem {
    pub fn new(
        supply: Vec<f64>,
        demand: Vec<f64>,
        costs: Vec<Vec<f64>>,
    ) -> Result<Self, SolveError> {
        Self::with_penalties(supply, demand, costs, None)
    }

    /// Build a problem with explicit penalties for synthetic capacity.
    ///
    /// Validates that the cost matrix is exactly `m x n`, that every
    /// supply and demand entry is non-negative, and that the penalty
    /// vectors (when given) match the supplier and customer counts.
    pub fn with_penalties(
        supply: Vec<f64>,
        demand: Vec<f64>,
        costs: Vec<Vec<f64>>,
        penalties: Option<Penalties>,
    ) -> Result<Self, SolveError> {
        let m = supply.len();
        let n = demand.len();

        if m == 0 {
            return Err(SolveError::ShapeMismatch {
                what: "suppliers",
                expected: 1,
                found: 0,
            });
        }
        if n == 0 {
            return Err(SolveError::ShapeMismatch {
                what: "customers",
                expected: 1,
                found: 0,
            });
        }
        if costs.len() != m {
            return Err(SolveError::ShapeMismatch {
                what: "cost matrix rows",
                expected: m,
                found: costs.len(),
            });
        }
        for row in &costs {
            if row.len() != n {
                return Err(SolveError::ShapeMismatch {
                    what: "cost matrix columns",
                    expected: n,
                    found: row.len(),
                });
            }
        }
        for (index, &value) in supply.iter().enumerate() {
            if value < 0.0 {
                return Err(SolveError::NegativeCapacity {
                    what: "supply",
                    index,
                    value,
                });
            }
        }
        for (index, &value) in demand.iter().enumerate() {
            if value < 0.0 {
                return Err(SolveError::NegativeCapacity {
                    what: "demand",
                    index,
                    value,
                });
            }
        }

        let penalties = penalties.unwrap_or_else(|| Penalties::free(m, n));
        if penalties.row.len() != m {
            return Err(SolveError::ShapeMismatch {
                what: "penalty rows",
                expected: m,
                found: penalties.row.len(),
            });
        }
        if penalties.column.len() != n {
            return Err(SolveError::ShapeMismatch {
                what: "penalty columns",
                expected: n,
                found: penalties.column.len(),
            });
        }

        Ok(Self {
            supply,
            demand,
            costs,
            penalties,
            has_dummy_row: false,
            has_dummy_column: false,
        })
    }

    /// Number of suppliers (cost matrix rows).
    pub fn m(&self) -> usize {
        self.supply.len()
    }

    /// Number of customers (cost matrix columns).
    pub fn n(&self) -> usize {
        self.demand.len()
    }

    pub fn supply(&self) -> &[f64] {
        &self.supply
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.costs[i][j]
    }

    /// True when balancing appended a free (zero-penalty) dummy supplier.
    pub fn has_dummy_row(&self) -> bool {
        self.has_dummy_row
    }

    /// True when balancing appended a free (zero-penalty) dummy customer.
    pub fn has_dummy_column(&self) -> bool {
        self.has_dummy_column
    }

    /// Total supply minus total demand.
    pub fn imbalance(&self) -> f64 {
        let supply: f64 = self.supply.iter().sum();
        let demand: f64 = self.demand.iter().sum();
        supply - demand
    }

    /// Evaluate the objective for an allocation matrix. Cells the
    /// allocation does not cover contribute nothing.
    pub fn objective(&self, allocation: &[Vec<f64>]) -> f64 {
        let mut total = 0.0;
        for (i, row) in self.costs.iter().enumerate() {
            for (j, &cost) in row.iter().enumerate() {
                let flow = allocation
                    .get(i)
                    .and_then(|r| r.get(j))
                    .copied()
                    .unwrap_or(0.0);
                total += cost * flow;
            }
        }
        total
    }

    /// Equalize total supply and total demand by appending one synthetic
    /// supplier or customer. No-op for balanced problems.
    pub fn balance(&mut self) {
        let diff = self.imbalance();
        if diff < 0.0 {
            self.add_dummy_supplier(-diff);
        } else if diff > 0.0 {
            self.add_dummy_customer(diff);
        }
    }

    fn add_dummy_supplier(&mut self, volume: f64) {
        let row = self.penalties.column.clone();
        if row.iter().all(|&c| c == 0.0) {
            self.has_dummy_row = true;
        }
        self.costs.push(row);
        self.supply.push(volume);
    }

    fn add_dummy_customer(&mut self, volume: f64) {
        let column = self.penalties.row.clone();
        if column.iter().all(|&c| c == 0.0) {
            self.has_dummy_column = true;
        }
        for (row, &cost) in self.costs.iter_mut().zip(&column) {
            row.push(cost);
        }
        self.demand.push(volume);
    }
}

/// Wire-format solve request, matching the JSON schema spoken by the web
/// client: `costs`, `supply`, `demand`, `method`, plus optional penalties.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SolveRequest {
    pub costs: Vec<Vec<f64>>,
    pub supply: Vec<f64>,
    pub demand: Vec<f64>,
    pub method: StartMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<Penalties>,
}

#[cfg(feature = "serde")]
impl SolveRequest {
    /// Validate the request into a problem instance.
    pub fn into_problem(self) -> Result<TransportProblem, SolveError> {
        TransportProblem::with_penalties(self.supply, self.demand, self.costs, self.penalties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_rows() {
        // 2x3 cost matrix against 3 suppliers must fail before any solving.
        let result = TransportProblem::new(
            vec![10.0, 20.0, 30.0],
            vec![20.0, 20.0, 20.0],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::ShapeMismatch {
                what: "cost matrix rows",
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_shape_mismatch_ragged_row() {
        let result = TransportProblem::new(
            vec![10.0, 20.0],
            vec![15.0, 15.0],
            vec![vec![1.0, 2.0], vec![4.0]],
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::ShapeMismatch {
                what: "cost matrix columns",
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_negative_supply() {
        let result = TransportProblem::new(
            vec![10.0, -5.0],
            vec![2.0, 3.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::NegativeCapacity {
                what: "supply",
                index: 1,
                value: -5.0,
            }
        );
    }

    #[test]
    fn test_negative_demand() {
        let result = TransportProblem::new(
            vec![10.0, 5.0],
            vec![-2.0, 3.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        assert!(matches!(
            result,
            Err(SolveError::NegativeCapacity { what: "demand", index: 0, .. })
        ));
    }

    #[test]
    fn test_penalty_length_mismatch() {
        let result = TransportProblem::with_penalties(
            vec![10.0, 5.0],
            vec![7.0, 8.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            Some(Penalties {
                row: vec![1.0],
                column: vec![0.0, 0.0],
            }),
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::ShapeMismatch {
                what: "penalty rows",
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_imbalance() {
        let problem = TransportProblem::new(
            vec![50.0, 40.0],
            vec![30.0, 35.0],
            vec![vec![3.0, 5.0], vec![4.0, 2.0]],
        )
        .expect("valid problem");
        assert_eq!(problem.imbalance(), 25.0);
    }

    #[test]
    fn test_balance_noop_when_balanced() {
        let mut problem = TransportProblem::new(
            vec![10.0, 20.0],
            vec![15.0, 15.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .expect("valid problem");
        problem.balance();
        assert_eq!(problem.m(), 2);
        assert_eq!(problem.n(), 2);
        assert!(!problem.has_dummy_row());
        assert!(!problem.has_dummy_column());
    }

    #[test]
    fn test_balance_adds_dummy_customer() {
        // Supply exceeds demand by 25: a free dummy customer absorbs it.
        let mut problem = TransportProblem::new(
            vec![50.0, 40.0],
            vec![30.0, 35.0],
            vec![vec![3.0, 5.0], vec![4.0, 2.0]],
        )
        .expect("valid problem");
        problem.balance();
        assert_eq!(problem.imbalance(), 0.0);
        assert_eq!(problem.demand(), &[30.0, 35.0, 25.0]);
        assert_eq!(problem.cost(0, 2), 0.0);
        assert_eq!(problem.cost(1, 2), 0.0);
        assert!(problem.has_dummy_column());
        assert!(!problem.has_dummy_row());
    }

    #[test]
    fn test_balance_adds_dummy_supplier() {
        let mut problem = TransportProblem::new(
            vec![10.0, 15.0],
            vec![20.0, 25.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .expect("valid problem");
        problem.balance();
        assert_eq!(problem.imbalance(), 0.0);
        assert_eq!(problem.supply(), &[10.0, 15.0, 20.0]);
        assert_eq!(problem.cost(2, 0), 0.0);
        assert_eq!(problem.cost(2, 1), 0.0);
        assert!(problem.has_dummy_row());
        assert!(!problem.has_dummy_column());
    }

    #[test]
    fn test_penalized_dummy_is_not_free() {
        let mut problem = TransportProblem::with_penalties(
            vec![50.0, 40.0],
            vec![30.0, 35.0],
            vec![vec![3.0, 5.0], vec![4.0, 2.0]],
            Some(Penalties {
                row: vec![7.0, 9.0],
                column: vec![0.0, 0.0],
            }),
        )
        .expect("valid problem");
        problem.balance();
        // Surplus is routed through a priced column, so the dummy is not
        // marked free.
        assert_eq!(problem.cost(0, 2), 7.0);
        assert_eq!(problem.cost(1, 2), 9.0);
        assert!(!problem.has_dummy_column());
    }

    #[test]
    fn test_objective_is_deterministic() {
        let problem = TransportProblem::new(
            vec![20.0, 30.0, 25.0],
            vec![10.0, 25.0, 40.0],
            vec![
                vec![8.0, 6.0, 10.0],
                vec![9.0, 12.0, 13.0],
                vec![14.0, 9.0, 16.0],
            ],
        )
        .expect("valid problem");
        let allocation = vec![
            vec![0.0, 0.0, 20.0],
            vec![10.0, 0.0, 20.0],
            vec![0.0, 25.0, 0.0],
        ];
        let first = problem.objective(&allocation);
        let second = problem.objective(&allocation);
        assert_eq!(first, 775.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_objective_ignores_missing_cells() {
        let problem = TransportProblem::new(
            vec![10.0, 5.0],
            vec![7.0, 8.0],
            vec![vec![2.0, 3.0], vec![4.0, 5.0]],
        )
        .expect("valid problem");
        // Truncated allocation: absent cells count as zero flow.
        assert_eq!(problem.objective(&[vec![7.0]]), 14.0);
    }

    #[test]
    fn test_empty_dimensions_rejected() {
        let result = TransportProblem::new(vec![], vec![1.0], vec![]);
        assert!(matches!(
            result,
            Err(SolveError::ShapeMismatch { what: "suppliers", .. })
        ));
    }
}

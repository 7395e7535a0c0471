use crate::error::SolveError;
use crate::plan::{Plan, StartMethod, build_start_plan, is_degenerate, make_non_degenerate};
use crate::problem::TransportProblem;
use crate::solution::Solution;

/// Transportation solver: iterates the method of potentials over a basic
/// feasible plan until no non-basic cell can lower the cost.
pub struct Solver {
    /// Maximum number of pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve the problem to optimality with the given start method.
    ///
    /// Takes the problem by value: balancing appends a synthetic row or
    /// column and the plan evolves in place, so every call owns its whole
    /// state and concurrent solves cannot alias each other.
    pub fn solve(
        &self,
        mut problem: TransportProblem,
        method: StartMethod,
    ) -> Result<Solution, SolveError> {
        problem.balance();

        let mut plan = build_start_plan(&problem, method);
        if is_degenerate(&plan) {
            make_non_degenerate(&mut plan)?;
        }

        let mut pivots = 0;
        loop {
            let (u, v) = self.potentials(&problem, &plan)?;
            let Some(entering) = self.entering_cell(&problem, &plan, &u, &v) else {
                let objective = problem.objective(plan.values());
                return Ok(Solution {
                    allocation: plan.into_values(),
                    objective,
                    iterations: pivots,
                    has_dummy_row: problem.has_dummy_row(),
                    has_dummy_column: problem.has_dummy_column(),
                });
            };
            if pivots == self.max_iterations {
                return Err(SolveError::NoConvergence { iterations: pivots });
            }
            let cycle = self.find_cycle(&plan, entering)?;
            self.reallocate(&mut plan, &cycle);
            pivots += 1;
        }
    }

    /// Row and column potentials for the current basis, via label
    /// propagation from `u[0] = 0`.
    ///
    /// A full pass over the basic cells that resolves nothing while
    /// unknowns remain means the basis does not span the graph; without
    /// that check the propagation would spin forever.
    fn potentials(
        &self,
        problem: &TransportProblem,
        plan: &Plan,
    ) -> Result<(Vec<f64>, Vec<f64>), SolveError> {
        let mut u: Vec<Option<f64>> = vec![None; problem.m()];
        let mut v: Vec<Option<f64>> = vec![None; problem.n()];
        u[0] = Some(0.0);

        let mut unknown = problem.m() + problem.n() - 1;
        while unknown > 0 {
            let mut progressed = false;
            for (i, j) in plan.basic_cells() {
                match (u[i], v[j]) {
                    (Some(ui), None) => {
                        v[j] = Some(problem.cost(i, j) - ui);
                        unknown -= 1;
                        progressed = true;
                    }
                    (None, Some(vj)) => {
                        u[i] = Some(problem.cost(i, j) - vj);
                        unknown -= 1;
                        progressed = true;
                    }
                    _ => {}
                }
            }
            if !progressed {
                return Err(SolveError::DisconnectedBasis);
            }
        }

        let u: Option<Vec<f64>> = u.into_iter().collect();
        let v: Option<Vec<f64>> = v.into_iter().collect();
        match (u, v) {
            (Some(u), Some(v)) => Ok((u, v)),
            _ => Err(SolveError::DisconnectedBasis),
        }
    }

    /// The non-basic cell with the largest optimality violation
    /// `u[i] + v[j] - c[i][j]`, or `None` when the plan is optimal.
    /// Row-major order breaks ties.
    fn entering_cell(
        &self,
        problem: &TransportProblem,
        plan: &Plan,
        u: &[f64],
        v: &[f64],
    ) -> Option<(usize, usize)> {
        let mut best = self.tolerance;
        let mut cell = None;
        for i in 0..problem.m() {
            for j in 0..problem.n() {
                if plan.is_basic(i, j) {
                    continue;
                }
                let violation = u[i] + v[j] - problem.cost(i, j);
                if violation > best {
                    best = violation;
                    cell = Some((i, j));
                }
            }
        }
        cell
    }

    /// The unique alternating cycle through the entering cell and the
    /// basis, starting at the entering cell.
    ///
    /// Any cell alone in its row or column cannot sit on a cycle, so
    /// stripping such leaves repeatedly leaves exactly the cycle; with two
    /// survivors per involved line the walk from the entering cell is
    /// forced at every step.
    fn find_cycle(
        &self,
        plan: &Plan,
        entering: (usize, usize),
    ) -> Result<Vec<(usize, usize)>, SolveError> {
        let (m, n) = (plan.rows(), plan.cols());
        let (ei, ej) = entering;

        let mut active = vec![vec![false; n]; m];
        let mut row_count = vec![0usize; m];
        let mut col_count = vec![0usize; n];
        for (i, j) in plan.basic_cells() {
            active[i][j] = true;
            row_count[i] += 1;
            col_count[j] += 1;
        }
        active[ei][ej] = true;
        row_count[ei] += 1;
        col_count[ej] += 1;

        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..m {
                for j in 0..n {
                    if active[i][j] && (row_count[i] == 1 || col_count[j] == 1) {
                        active[i][j] = false;
                        row_count[i] -= 1;
                        col_count[j] -= 1;
                        changed = true;
                    }
                }
            }
        }

        if !active[ei][ej] {
            return Err(SolveError::NoImprovingCycle { row: ei, col: ej });
        }

        let mut cycle = vec![(ei, ej)];
        let (mut ci, mut cj) = (ei, ej);
        let mut along_row = true;
        loop {
            let next = if along_row {
                (0..n).find(|&j| j != cj && active[ci][j]).map(|j| (ci, j))
            } else {
                (0..m).find(|&i| i != ci && active[i][cj]).map(|i| (i, cj))
            };
            let Some((ni, nj)) = next else {
                return Err(SolveError::NoImprovingCycle { row: ei, col: ej });
            };
            if (ni, nj) == (ei, ej) {
                break;
            }
            cycle.push((ni, nj));
            if cycle.len() > m * n {
                return Err(SolveError::NoImprovingCycle { row: ei, col: ej });
            }
            (ci, cj) = (ni, nj);
            along_row = !along_row;
        }
        Ok(cycle)
    }

    /// Shift flow around the cycle: even positions (the entering cell
    /// first) gain, odd positions lose. The first losing cell holding the
    /// minimum leaves the basis, and only that one, so the basis size is
    /// preserved even when several losers hit zero together.
    fn reallocate(&self, plan: &mut Plan, cycle: &[(usize, usize)]) {
        let mut theta = f64::INFINITY;
        let mut leaving = cycle[1];
        for k in (1..cycle.len()).step_by(2) {
            let (i, j) = cycle[k];
            let value = plan.value(i, j);
            if value < theta {
                theta = value;
                leaving = (i, j);
            }
        }

        for (k, &(i, j)) in cycle.iter().enumerate() {
            let value = plan.value(i, j);
            if k % 2 == 0 {
                plan.set_value(i, j, value + theta);
            } else {
                plan.set_value(i, j, (value - theta).max(0.0));
            }
        }

        let (ei, ej) = cycle[0];
        plan.enter_basis(ei, ej);
        plan.leave_basis(leaving.0, leaving.1);
        plan.set_value(leaving.0, leaving.1, 0.0);
    }
}

use crate::error::SolveError;
use crate::problem::TransportProblem;

/// Strategy for constructing the initial basic feasible plan.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMethod {
    /// Repeatedly allocate at the cheapest still-open cell.
    MinElement,
    /// Sweep from the top-left corner, ignoring costs.
    NwCorner,
}

impl StartMethod {
    /// Parse the wire name used by the request schema.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min-element" => Some(Self::MinElement),
            "nw-corner" => Some(Self::NwCorner),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MinElement => "min-element",
            Self::NwCorner => "nw-corner",
        }
    }
}

/// A feasible allocation plus explicit basis membership.
///
/// Basis membership is tracked separately from the flow values because a
/// degenerate plan keeps zero-flow cells in its spanning structure; a cell
/// holding zero may or may not be basic.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    values: Vec<Vec<f64>>,
    basic: Vec<Vec<bool>>,
}

impl Plan {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            values: vec![vec![0.0; cols]; rows],
            basic: vec![vec![false; cols]; rows],
        }
    }

    pub(crate) fn rows(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn cols(&self) -> usize {
        self.values.first().map(|r| r.len()).unwrap_or(0)
    }

    pub(crate) fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub(crate) fn is_basic(&self, i: usize, j: usize) -> bool {
        self.basic[i][j]
    }

    pub(crate) fn basis_size(&self) -> usize {
        self.basic.iter().flatten().filter(|&&b| b).count()
    }

    /// Basic cells in row-major order.
    pub(crate) fn basic_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.basic.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, b)| *b)
                .map(move |(j, _)| (i, j))
        })
    }

    /// Allocate flow at a cell and mark it basic.
    pub(crate) fn place(&mut self, i: usize, j: usize, amount: f64) {
        self.values[i][j] = amount;
        self.basic[i][j] = true;
    }

    pub(crate) fn set_value(&mut self, i: usize, j: usize, value: f64) {
        self.values[i][j] = value;
    }

    pub(crate) fn enter_basis(&mut self, i: usize, j: usize) {
        self.basic[i][j] = true;
    }

    pub(crate) fn leave_basis(&mut self, i: usize, j: usize) {
        self.basic[i][j] = false;
    }

    pub(crate) fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub(crate) fn into_values(self) -> Vec<Vec<f64>> {
        self.values
    }
}

/// Build the initial basic feasible plan for a balanced problem.
pub(crate) fn build_start_plan(problem: &TransportProblem, method: StartMethod) -> Plan {
    match method {
        StartMethod::MinElement => minimum_element(problem),
        StartMethod::NwCorner => northwest_corner(problem),
    }
}

fn northwest_corner(problem: &TransportProblem) -> Plan {
    let (m, n) = (problem.m(), problem.n());
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();
    let mut plan = Plan::new(m, n);

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        let amount = supply[i].min(demand[j]);
        plan.place(i, j, amount);
        supply[i] -= amount;
        demand[j] -= amount;
        // At least one side is exhausted after every step. When both are,
        // the cursor moves diagonally and the basis comes up short; the
        // degeneracy repair pass fills the gap.
        if supply[i] == 0.0 {
            i += 1;
        }
        if demand[j] == 0.0 {
            j += 1;
        }
    }
    plan
}

fn minimum_element(problem: &TransportProblem) -> Plan {
    let (m, n) = (problem.m(), problem.n());
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();
    let mut plan = Plan::new(m, n);

    let mut row_open: Vec<bool> = supply.iter().map(|&s| s > 0.0).collect();
    let mut col_open: Vec<bool> = demand.iter().map(|&d| d > 0.0).collect();

    while let Some((i, j)) = cheapest_open_cell(problem, &row_open, &col_open) {
        let amount = supply[i].min(demand[j]);
        plan.place(i, j, amount);
        supply[i] -= amount;
        demand[j] -= amount;
        if supply[i] == 0.0 {
            row_open[i] = false;
        }
        if demand[j] == 0.0 {
            col_open[j] = false;
        }
    }
    plan
}

/// Cheapest cell with an open row and column, first in row-major order on
/// ties.
fn cheapest_open_cell(
    problem: &TransportProblem,
    row_open: &[bool],
    col_open: &[bool],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut best_cost = f64::INFINITY;
    for (i, _) in row_open.iter().enumerate().filter(|&(_, open)| *open) {
        for (j, _) in col_open.iter().enumerate().filter(|&(_, open)| *open) {
            let cost = problem.cost(i, j);
            if cost < best_cost {
                best_cost = cost;
                best = Some((i, j));
            }
        }
    }
    best
}

/// True when the plan has fewer basic cells than the spanning-tree size
/// `m + n - 1`.
pub(crate) fn is_degenerate(plan: &Plan) -> bool {
    plan.basis_size() < plan.rows() + plan.cols() - 1
}

/// Pad a degenerate plan with zero-flow basic cells until the basis spans
/// all `m + n` nodes.
///
/// Every padded cell must bridge two disconnected components of the
/// bipartite basis graph; a cell inside one component would close a cycle
/// and the basis would stop being a tree.
pub(crate) fn make_non_degenerate(plan: &mut Plan) -> Result<(), SolveError> {
    let (m, n) = (plan.rows(), plan.cols());
    let target = m + n - 1;

    let mut components = UnionFind::new(m + n);
    for i in 0..m {
        for j in 0..n {
            if plan.is_basic(i, j) {
                components.union(i, m + j);
            }
        }
    }

    let mut size = plan.basis_size();
    while size < target {
        let mut padded = false;
        'scan: for i in 0..m {
            for j in 0..n {
                if !plan.is_basic(i, j) && components.union(i, m + j) {
                    plan.place(i, j, 0.0);
                    size += 1;
                    padded = true;
                    break 'scan;
                }
            }
        }
        if !padded {
            // All remaining cells stay inside one component yet the basis
            // is still short, so it already contains a cycle.
            return Err(SolveError::DisconnectedBasis);
        }
    }
    Ok(())
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, x: usize, y: usize) -> bool {
        let px = self.find(x);
        let py = self.find(y);
        if px == py {
            return false;
        }
        if self.rank[px] < self.rank[py] {
            self.parent[px] = py;
        } else if self.rank[px] > self.rank[py] {
            self.parent[py] = px;
        } else {
            self.parent[py] = px;
            self.rank[px] += 1;
        }
        true
    }
}

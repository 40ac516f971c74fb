use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashSet;

/// Cost of an Up/Down/Left/Right move.
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of a diagonal move: the truncated literal, not `SQRT_2`.
pub const DIAGONAL_COST: f64 = 1.414;

/// A steppable search strategy.
///
/// Every call to [`Solver::advance`] performs one unit of work (one node
/// popped and expanded) and returns the resulting [`Snapshot`]. The caller
/// owns the pacing; solvers hold no timers.
pub trait Solver {
    /// Human readable name, including any tuning parameters.
    fn name(&self) -> String;

    /// Performs one unit of work.
    ///
    /// # Panics
    ///
    /// Panics if called after a terminal snapshot was returned.
    fn advance(&mut self, grid: &mut Grid) -> Snapshot;

    fn stats(&self) -> SolverStats;

    fn is_finished(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Frontier pops, including stale entries that were skipped.
    pub steps: usize,
    /// Cells on the final path; zero until a path is found.
    pub path_length: usize,
}

pub fn step_cost(from: &Position, to: &Position) -> f64 {
    if from.is_diagonal_to(to) {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Sum of step costs along `path`.
pub fn path_cost(path: &[Position]) -> f64 {
    path.windows(2).map(|pair| step_cost(&pair[0], &pair[1])).sum()
}

/// Follows `parent` links from `terminal` back to a node without a parent
/// and returns the chain ordered root first.
///
/// # Panics
///
/// Panics if the chain is longer than `max_len`, which can only happen when
/// the parent links form a cycle.
pub fn trace_parents<F>(terminal: Position, max_len: usize, parent: F) -> Vec<Position>
where
    F: Fn(Position) -> Option<Position>,
{
    let mut path = vec![terminal];
    let mut current = terminal;
    while let Some(next) = parent(current) {
        assert!(
            path.len() < max_len,
            "parent links from ({}, {}) form a cycle",
            terminal.row,
            terminal.col
        );
        path.push(next);
        current = next;
    }
    path.reverse();
    path
}

/// Walks the grid's node table from `terminal` back to the search origin.
pub fn reconstruct_path(grid: &Grid, terminal: Position) -> Vec<Position> {
    trace_parents(terminal, grid.cell_count(), |pos| grid.parent_of(pos))
}

/// Records `parent` as the discoverer of `child` and derives its depth.
pub(crate) fn link(grid: &mut Grid, child: Position, parent: Position) {
    let depth = grid.depth_of(parent) + 1;
    if let Some(node) = grid.node_mut(child) {
        node.parent = Some(parent);
        node.depth = depth;
    }
}

/// Bookkeeping every single-frontier strategy shares: the visited set,
/// counters and the terminal latch.
#[derive(Debug, Clone)]
pub(crate) struct SearchProgress {
    pub target: Position,
    pub visited: FxHashSet<Position>,
    pub stats: SolverStats,
    finished: bool,
}

impl SearchProgress {
    pub fn new(target: Position) -> Self {
        SearchProgress {
            target,
            visited: FxHashSet::default(),
            stats: SolverStats::default(),
            finished: false,
        }
    }

    pub fn begin_step(&self) {
        assert!(!self.finished, "advance called on a finished search");
    }

    /// Counts a pop and marks `pos` visited. Returns false for stale pops.
    pub fn pop(&mut self, pos: Position) -> bool {
        self.stats.steps += 1;
        self.visited.insert(pos)
    }

    pub fn is_visited(&self, pos: &Position) -> bool {
        self.visited.contains(pos)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn searching(&self, frontier: Vec<Position>) -> Snapshot {
        Snapshot::searching(frontier, self.visited.clone())
    }

    pub fn succeed(&mut self, frontier: Vec<Position>, path: Vec<Position>) -> Snapshot {
        self.finished = true;
        self.stats.path_length = path.len();
        Snapshot::found(frontier, self.visited.clone(), path)
    }

    pub fn fail(&mut self, frontier: Vec<Position>) -> Snapshot {
        self.finished = true;
        Snapshot::exhausted(frontier, self.visited.clone())
    }
}

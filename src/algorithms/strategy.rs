use crate::algorithms::beam::{Beam, DEFAULT_BEAM_WIDTH};
use crate::algorithms::bfs::Bfs;
use crate::algorithms::bidirectional::Bidirectional;
use crate::algorithms::common::{Solver, SolverStats};
use crate::algorithms::depth_limited::{
    DepthLimited, IterativeDeepening, DEFAULT_DEPTH_LIMIT, DEFAULT_MAX_DEPTH,
};
use crate::algorithms::dfs::Dfs;
use crate::algorithms::scout::{Scout, DEFAULT_BFS_LAYERS, DEFAULT_DFS_LAYERS};
use crate::algorithms::ucs::Ucs;
use crate::error::SimulationError;
use crate::grid::Grid;
use crate::snapshot::Snapshot;
use std::fmt;
use std::str::FromStr;

/// Tuning knobs for the strategies that take any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParams {
    pub depth_limit: usize,
    pub max_depth: usize,
    pub bfs_layers: usize,
    pub dfs_layers: usize,
    pub beam_width: usize,
    /// Seed for randomized DFS; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            bfs_layers: DEFAULT_BFS_LAYERS,
            dfs_layers: DEFAULT_DFS_LAYERS,
            beam_width: DEFAULT_BEAM_WIDTH,
            seed: None,
        }
    }
}

/// The nine strategies, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    Dfs,
    RandomizedDfs,
    Ucs,
    DepthLimited,
    IterativeDeepening,
    Bidirectional,
    Scout,
    Beam,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::RandomizedDfs,
        Algorithm::Ucs,
        Algorithm::DepthLimited,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional,
        Algorithm::Scout,
        Algorithm::Beam,
    ];

    pub fn from_index(index: usize) -> Option<Algorithm> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).unwrap_or_default()
    }

    /// Short name used on the command line and in CSV output.
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::RandomizedDfs => "random_dfs",
            Algorithm::Ucs => "ucs",
            Algorithm::DepthLimited => "dls",
            Algorithm::IterativeDeepening => "iddfs",
            Algorithm::Bidirectional => "bidirectional",
            Algorithm::Scout => "scout",
            Algorithm::Beam => "beam",
        }
    }

    /// Builds a fresh strategy for one run. Resets the grid's node table.
    pub fn create(self, grid: &mut Grid, params: &SolverParams) -> Strategy {
        match self {
            Algorithm::Bfs => Strategy::Bfs(Bfs::new(grid)),
            Algorithm::Dfs => Strategy::Dfs(Dfs::new(grid)),
            Algorithm::RandomizedDfs => {
                Strategy::RandomizedDfs(Dfs::randomized(grid, params.seed))
            }
            Algorithm::Ucs => Strategy::Ucs(Ucs::new(grid)),
            Algorithm::DepthLimited => {
                Strategy::DepthLimited(DepthLimited::new(grid, params.depth_limit))
            }
            Algorithm::IterativeDeepening => {
                Strategy::IterativeDeepening(IterativeDeepening::new(grid, params.max_depth))
            }
            Algorithm::Bidirectional => Strategy::Bidirectional(Bidirectional::new(grid)),
            Algorithm::Scout => {
                Strategy::Scout(Scout::new(grid, params.bfs_layers, params.dfs_layers))
            }
            Algorithm::Beam => Strategy::Beam(Beam::new(grid, params.beam_width)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Algorithm {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let algorithm = match normalized.as_str() {
            "bfs" | "breadth_first" => Algorithm::Bfs,
            "dfs" | "depth_first" => Algorithm::Dfs,
            "random_dfs" | "randomized_dfs" | "chaos" => Algorithm::RandomizedDfs,
            "ucs" | "uniform_cost" => Algorithm::Ucs,
            "dls" | "depth_limited" => Algorithm::DepthLimited,
            "iddfs" | "iterative_deepening" => Algorithm::IterativeDeepening,
            "bidirectional" | "bidi" => Algorithm::Bidirectional,
            "scout" => Algorithm::Scout,
            "beam" | "custom" => Algorithm::Beam,
            _ => return Err(SimulationError::UnknownAlgorithm(s.to_string())),
        };
        Ok(algorithm)
    }
}

/// A running strategy. One variant per [`Algorithm`].
pub enum Strategy {
    Bfs(Bfs),
    Dfs(Dfs),
    RandomizedDfs(Dfs),
    Ucs(Ucs),
    DepthLimited(DepthLimited),
    IterativeDeepening(IterativeDeepening),
    Bidirectional(Bidirectional),
    Scout(Scout),
    Beam(Beam),
}

impl Strategy {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Strategy::Bfs(_) => Algorithm::Bfs,
            Strategy::Dfs(_) => Algorithm::Dfs,
            Strategy::RandomizedDfs(_) => Algorithm::RandomizedDfs,
            Strategy::Ucs(_) => Algorithm::Ucs,
            Strategy::DepthLimited(_) => Algorithm::DepthLimited,
            Strategy::IterativeDeepening(_) => Algorithm::IterativeDeepening,
            Strategy::Bidirectional(_) => Algorithm::Bidirectional,
            Strategy::Scout(_) => Algorithm::Scout,
            Strategy::Beam(_) => Algorithm::Beam,
        }
    }

    fn solver(&self) -> &dyn Solver {
        match self {
            Strategy::Bfs(s) => s,
            Strategy::Dfs(s) | Strategy::RandomizedDfs(s) => s,
            Strategy::Ucs(s) => s,
            Strategy::DepthLimited(s) => s,
            Strategy::IterativeDeepening(s) => s,
            Strategy::Bidirectional(s) => s,
            Strategy::Scout(s) => s,
            Strategy::Beam(s) => s,
        }
    }

    fn solver_mut(&mut self) -> &mut dyn Solver {
        match self {
            Strategy::Bfs(s) => s,
            Strategy::Dfs(s) | Strategy::RandomizedDfs(s) => s,
            Strategy::Ucs(s) => s,
            Strategy::DepthLimited(s) => s,
            Strategy::IterativeDeepening(s) => s,
            Strategy::Bidirectional(s) => s,
            Strategy::Scout(s) => s,
            Strategy::Beam(s) => s,
        }
    }
}

impl Solver for Strategy {
    fn name(&self) -> String {
        self.solver().name()
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.solver_mut().advance(grid)
    }

    fn stats(&self) -> SolverStats {
        self.solver().stats()
    }

    fn is_finished(&self) -> bool {
        self.solver().is_finished()
    }
}

use crate::algorithms::common::SolverStats;
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use pathfinding::prelude::{bfs, dijkstra};
use std::fmt;
use std::time::Duration;

// Step costs in thousandths, so the `dijkstra` oracle can work on integers.
const ORTHOGONAL_MILLIS: u32 = 1000;
const DIAGONAL_MILLIS: u32 = 1414;

/// Per-step figures reported to whoever drives the search.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry {
    pub steps: usize,
    pub nodes_visited: usize,
    pub frontier_size: usize,
    pub path_length: usize,
    pub elapsed: Duration,
}

impl Telemetry {
    pub fn capture(stats: SolverStats, snapshot: &Snapshot, elapsed: Duration) -> Self {
        Telemetry {
            steps: stats.steps,
            nodes_visited: snapshot.visited.len(),
            frontier_size: snapshot.frontier.len(),
            path_length: snapshot.path_len(),
            elapsed,
        }
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "steps: {} | visited: {} | frontier: {} | path: {} | elapsed: {:.2?}",
            self.steps, self.nodes_visited, self.frontier_size, self.path_length, self.elapsed
        )
    }
}

/// Fewest cells on any start-to-target path, counting both endpoints.
pub fn optimal_path_length(grid: &Grid) -> Option<usize> {
    let target = grid.target();
    bfs(&grid.start(), |pos| grid.neighbors(pos), |pos| *pos == target).map(|path| path.len())
}

/// Cheapest start-to-target cost under the 1.0 / 1.414 step costs.
pub fn optimal_path_cost(grid: &Grid) -> Option<f64> {
    let target = grid.target();
    dijkstra(
        &grid.start(),
        |pos: &Position| {
            let from = *pos;
            grid.neighbors(pos).into_iter().map(move |next| {
                let cost = if from.is_diagonal_to(&next) {
                    DIAGONAL_MILLIS
                } else {
                    ORTHOGONAL_MILLIS
                };
                (next, cost)
            })
        },
        |pos| *pos == target,
    )
    .map(|(_, millis)| millis as f64 / 1000.0)
}

/// Outcome of one complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub name: String,
    pub success: bool,
    pub telemetry: Telemetry,
    pub path_cost: f64,
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
}

impl RunSummary {
    pub fn new(
        algorithm: Algorithm,
        name: String,
        telemetry: Telemetry,
        path_cost: f64,
        optimal_path_length: Option<usize>,
    ) -> Self {
        let mut summary = RunSummary {
            algorithm,
            name,
            success: telemetry.path_length > 0,
            telemetry,
            path_cost,
            optimal_path_length,
            route_efficiency: 0.0,
        };
        summary.calculate_efficiency();
        summary
    }

    /// Path length relative to the shortest possible one; 1.0 is optimal.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_path_length {
            Some(optimal) if self.success && optimal > 0 => {
                self.telemetry.path_length as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.name)?;
        writeln!(f, "Result: {}", if self.success { "path found" } else { "no path" })?;
        writeln!(f, "Steps: {}", self.telemetry.steps)?;
        writeln!(f, "Nodes Visited: {}", self.telemetry.nodes_visited)?;
        writeln!(f, "Frontier Size: {}", self.telemetry.frontier_size)?;
        writeln!(f, "Path Length: {}", self.telemetry.path_length)?;
        writeln!(f, "Path Cost: {:.3}", self.path_cost)?;
        match self.optimal_path_length {
            Some(optimal) => writeln!(f, "Optimal Path Length: {}", optimal)?,
            None => writeln!(f, "Optimal Path Length: unreachable")?,
        }
        writeln!(f, "Elapsed: {:.2?}", self.telemetry.elapsed)?;

        if self.route_efficiency > 0.0 {
            writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;
            if self.route_efficiency > 1.0 {
                let extra = self
                    .telemetry
                    .path_length
                    .saturating_sub(self.optimal_path_length.unwrap_or_default());
                writeln!(f, "Extra cells over the shortest path: {}", extra)?;
            }
        }
        Ok(())
    }
}

use crate::algorithms::{path_cost, Algorithm, Solver, SolverParams, Strategy};
use crate::config::Config;
use crate::error::SimulationError;
use crate::grid::{Grid, Position};
use crate::history::{StepHistory, DEFAULT_HISTORY_CAPACITY};
use crate::snapshot::Snapshot;
use crate::statistics::{optimal_path_length, RunSummary, Telemetry};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No search has been started since the last reset.
    Idle,
    /// Free running: every `tick` advances the search.
    Running,
    /// A search is in progress but only `step` advances it.
    Paused,
    /// The last search reached a terminal snapshot.
    Finished,
}

/// What one `advance` produced, plus the figures derived from it.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub snapshot: Snapshot,
    pub telemetry: Telemetry,
}

#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub summary: RunSummary,
    pub final_snapshot: Snapshot,
}

/// Drives one strategy at a time over a grid and records its snapshots.
///
/// Grid topology can only be edited while no search is in progress
/// (status `Idle` or `Finished`); a successful edit discards the finished
/// run so the display never shows a search over a different grid.
pub struct Simulation {
    grid: Grid,
    algorithm: Algorithm,
    params: SolverParams,
    strategy: Option<Strategy>,
    history: StepHistory,
    status: RunStatus,
    started_at: Option<Instant>,
    elapsed: Duration,
    telemetry: Option<Telemetry>,
}

impl Simulation {
    pub fn new(grid: Grid, algorithm: Algorithm, params: SolverParams) -> Self {
        Simulation {
            grid,
            algorithm,
            params,
            strategy: None,
            history: StepHistory::new(DEFAULT_HISTORY_CAPACITY),
            status: RunStatus::Idle,
            started_at: None,
            elapsed: Duration::ZERO,
            telemetry: None,
        }
    }

    /// Builds the grid described by `config` and selects its algorithm.
    /// `all` is not a single algorithm and is rejected here.
    pub fn from_config(config: &Config) -> Result<Self, SimulationError> {
        let algorithm: Algorithm = config.algorithm.parse()?;
        let grid = config.build_grid(config.density, config.seed)?;
        Ok(Simulation::new(grid, algorithm, config.solver_params())
            .with_history_capacity(config.history_capacity))
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = StepHistory::new(capacity);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn history(&self) -> &StepHistory {
        &self.history
    }

    /// Telemetry of the most recent step, if any.
    pub fn telemetry(&self) -> Option<Telemetry> {
        self.telemetry
    }

    /// Human readable name of the running strategy, or of the selected
    /// algorithm when nothing has been started.
    pub fn strategy_name(&self) -> String {
        match &self.strategy {
            Some(strategy) => strategy.name(),
            None => self.algorithm.key().to_string(),
        }
    }

    /// True while a search holds state that grid edits would invalidate.
    pub fn is_active(&self) -> bool {
        matches!(self.status, RunStatus::Running | RunStatus::Paused)
    }

    /// Snapshot under the history cursor. Differs from the newest one after
    /// a rewind.
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.history.current()
    }

    /// Switches strategy. Any run in progress is discarded.
    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        if self.is_active() {
            debug!("discarding {} run to switch to {}", self.algorithm, algorithm);
        }
        self.reset();
        self.algorithm = algorithm;
    }

    /// Starts free running, or resumes a paused search.
    pub fn run(&mut self) {
        match self.status {
            RunStatus::Idle | RunStatus::Finished => self.begin(),
            RunStatus::Running | RunStatus::Paused => {}
        }
        self.status = RunStatus::Running;
    }

    /// Toggles between running and paused. Has no effect otherwise.
    pub fn pause(&mut self) -> RunStatus {
        self.status = match self.status {
            RunStatus::Running => RunStatus::Paused,
            RunStatus::Paused => RunStatus::Running,
            other => other,
        };
        self.status
    }

    /// Advances once if free running. This is what a timer should call.
    pub fn tick(&mut self) -> Option<StepReport> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.advance_once()
    }

    /// Advances exactly once and leaves the search paused. A new search is
    /// started when none is in progress.
    pub fn step(&mut self) -> Option<StepReport> {
        match self.status {
            RunStatus::Idle | RunStatus::Finished => self.begin(),
            RunStatus::Running | RunStatus::Paused => {}
        }
        self.status = RunStatus::Paused;
        self.advance_once()
    }

    /// Moves the history cursor back one snapshot, pausing a free run.
    ///
    /// Only the display rewinds: the strategy keeps its newest state and the
    /// next step continues from there.
    pub fn rewind(&mut self) -> Option<&Snapshot> {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Paused;
        }
        self.history.rewind()
    }

    pub fn forward(&mut self) -> Option<&Snapshot> {
        self.history.forward()
    }

    /// Drops the current search and its history. Walls and endpoints stay.
    pub fn reset(&mut self) {
        self.strategy = None;
        self.history.clear();
        self.grid.reset_search();
        self.status = RunStatus::Idle;
        self.started_at = None;
        self.elapsed = Duration::ZERO;
        self.telemetry = None;
    }

    /// Like [`Simulation::reset`], and also removes every wall.
    pub fn clear(&mut self) {
        self.reset();
        self.grid.clear_all();
    }

    pub fn set_start(&mut self, pos: Position) -> Result<bool, SimulationError> {
        self.ensure_editable()?;
        Ok(self.grid.set_start(pos))
    }

    pub fn set_target(&mut self, pos: Position) -> Result<bool, SimulationError> {
        self.ensure_editable()?;
        Ok(self.grid.set_target(pos))
    }

    pub fn toggle_blocked(&mut self, pos: Position, blocked: bool) -> Result<bool, SimulationError> {
        self.ensure_editable()?;
        Ok(self.grid.toggle_blocked(pos, blocked))
    }

    /// Replaces all walls with a random layout. Returns the number placed.
    pub fn generate_walls(&mut self, density: f64, seed: Option<u64>) -> Result<usize, SimulationError> {
        self.ensure_editable()?;
        Ok(self.grid.generate_random_walls(density, seed)?)
    }

    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), SimulationError> {
        self.ensure_editable()?;
        self.grid.resize(rows, cols)?;
        Ok(())
    }

    /// Runs (or resumes) the selected strategy until it terminates.
    pub fn run_to_completion(&mut self) -> RunSummary {
        self.run();
        while self.tick().is_some() {}
        self.summary()
    }

    /// Same as [`Simulation::run_to_completion`], redrawing the grid after
    /// every step and sleeping `delay` in between.
    pub fn run_visualized(&mut self, delay: Duration) -> RunSummary {
        self.run();
        while let Some(report) = self.tick() {
            self.clear_screen();
            println!("=== STEPWISE SEARCH ===");
            println!("Algorithm: {}", self.strategy_name());
            println!("{}", report.telemetry);
            self.grid.print_grid(Some(&report.snapshot));
            thread::sleep(delay);
        }
        self.summary()
    }

    /// Summary of the newest recorded state.
    pub fn summary(&self) -> RunSummary {
        let telemetry = self.telemetry.unwrap_or_default();
        let cost = self
            .history
            .latest()
            .and_then(|snapshot| snapshot.path.as_deref())
            .map_or(0.0, path_cost);

        RunSummary::new(
            self.algorithm,
            self.strategy_name(),
            telemetry,
            cost,
            optimal_path_length(&self.grid),
        )
    }

    /// Runs every strategy to completion on its own copy of `grid`.
    pub fn run_all_algorithms(grid: &Grid, params: &SolverParams) -> Vec<AlgorithmResult> {
        info!(
            "comparing {} algorithms on a {}x{} grid with {} walls",
            Algorithm::ALL.len(),
            grid.rows(),
            grid.cols(),
            grid.blocked_count()
        );

        let mut results = Vec::with_capacity(Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            let mut simulation = Simulation::new(grid.clone(), algorithm, *params);
            let summary = simulation.run_to_completion();
            let final_snapshot = simulation.history.latest().cloned().unwrap_or_default();
            results.push(AlgorithmResult {
                summary,
                final_snapshot,
            });
        }
        results
    }

    pub fn print_comparison_results(results: &[AlgorithmResult]) {
        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        println!();
        println!(
            "{:<40} {:<8} {:<8} {:<8} {:<8} {:<10} {:<8} {:<11} {:<12}",
            "Algorithm", "Success", "Steps", "Visited", "Path", "Cost", "Optimal", "Efficiency", "Elapsed"
        );
        println!("{}", "-".repeat(120));

        for result in results {
            let summary = &result.summary;
            let success_str = if summary.success { "yes" } else { "no" };
            let optimal_str = summary
                .optimal_path_length
                .map_or_else(|| "-".to_string(), |len| len.to_string());
            println!(
                "{:<40} {:<8} {:<8} {:<8} {:<8} {:<10.3} {:<8} {:<11.3} {:<12}",
                summary.name,
                success_str,
                summary.telemetry.steps,
                summary.telemetry.nodes_visited,
                summary.telemetry.path_length,
                summary.path_cost,
                optimal_str,
                summary.route_efficiency,
                format!("{:.2?}", summary.telemetry.elapsed),
            );
        }
        println!();

        let successful: Vec<&RunSummary> = results
            .iter()
            .map(|result| &result.summary)
            .filter(|summary| summary.success)
            .collect();

        if successful.is_empty() {
            println!("No algorithm reached the target.");
            return;
        }

        println!("=== PERFORMANCE ANALYSIS ===");
        if let Some(best) = successful.iter().min_by_key(|s| s.telemetry.path_length) {
            println!("Shortest path: {} ({} cells)", best.name, best.telemetry.path_length);
        }
        if let Some(best) = successful.iter().min_by(|a, b| a.path_cost.total_cmp(&b.path_cost)) {
            println!("Cheapest path: {} (cost {:.3})", best.name, best.path_cost);
        }
        if let Some(best) = successful.iter().min_by_key(|s| s.telemetry.steps) {
            println!("Fewest steps: {} ({} steps)", best.name, best.telemetry.steps);
        }
        if let Some(best) = successful.iter().min_by_key(|s| s.telemetry.nodes_visited) {
            println!(
                "Fewest nodes visited: {} ({} nodes)",
                best.name, best.telemetry.nodes_visited
            );
        }

        let failed = results.len() - successful.len();
        if failed > 0 {
            println!("{} algorithm(s) did not reach the target.", failed);
        }
    }

    fn begin(&mut self) {
        self.history.clear();
        self.strategy = Some(self.algorithm.create(&mut self.grid, &self.params));
        self.started_at = Some(Instant::now());
        self.elapsed = Duration::ZERO;
        self.telemetry = None;
        info!("starting {} on a {}x{} grid", self.strategy_name(), self.grid.rows(), self.grid.cols());
    }

    fn advance_once(&mut self) -> Option<StepReport> {
        let strategy = self.strategy.as_mut()?;
        if strategy.is_finished() {
            self.status = RunStatus::Finished;
            return None;
        }

        let snapshot = strategy.advance(&mut self.grid);
        if let Some(started_at) = self.started_at {
            self.elapsed = started_at.elapsed();
        }
        let telemetry = Telemetry::capture(strategy.stats(), &snapshot, self.elapsed);

        if snapshot.is_terminal() {
            self.status = RunStatus::Finished;
            info!(
                "{} finished: {} after {} steps, path length {}",
                strategy.name(),
                if snapshot.is_success() { "found" } else { "exhausted" },
                telemetry.steps,
                telemetry.path_length
            );
        }

        self.history.record(snapshot.clone());
        self.telemetry = Some(telemetry);
        Some(StepReport { snapshot, telemetry })
    }

    fn ensure_editable(&mut self) -> Result<(), SimulationError> {
        if self.is_active() {
            warn!("grid edit refused: {} is still searching", self.strategy_name());
            return Err(SimulationError::SearchInProgress);
        }
        if self.status == RunStatus::Finished {
            self.reset();
        }
        Ok(())
    }

    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

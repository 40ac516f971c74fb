use crate::algorithms::common::{link, reconstruct_path, SearchProgress, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Breadth-first search over a FIFO queue.
///
/// Shortest path in number of moves, since every edge is treated as unit cost.
pub struct Bfs {
    frontier: VecDeque<Position>,
    queued: FxHashSet<Position>,
    progress: SearchProgress,
}

impl Bfs {
    pub fn new(grid: &mut Grid) -> Self {
        grid.reset_search();
        let start = grid.start();

        let mut queued = FxHashSet::default();
        queued.insert(start);

        Bfs {
            frontier: VecDeque::from([start]),
            queued,
            progress: SearchProgress::new(grid.target()),
        }
    }

    fn frontier(&self) -> Vec<Position> {
        self.frontier.iter().copied().collect()
    }
}

impl Solver for Bfs {
    fn name(&self) -> String {
        "Breadth-First Search (BFS)".to_string()
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.progress.begin_step();

        while let Some(current) = self.frontier.pop_front() {
            self.queued.remove(&current);
            if !self.progress.pop(current) {
                continue;
            }

            if current == self.progress.target {
                let path = reconstruct_path(grid, current);
                let frontier = self.frontier();
                return self.progress.succeed(frontier, path);
            }

            for neighbor in grid.neighbors(&current) {
                if !self.progress.is_visited(&neighbor) && self.queued.insert(neighbor) {
                    link(grid, neighbor, current);
                    self.frontier.push_back(neighbor);
                }
            }

            return self.progress.searching(self.frontier());
        }

        self.progress.fail(Vec::new())
    }

    fn stats(&self) -> SolverStats {
        self.progress.stats
    }

    fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}

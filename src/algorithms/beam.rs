use crate::algorithms::common::{link, reconstruct_path, SearchProgress, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub const DEFAULT_BEAM_WIDTH: usize = 10;

/// Breadth-first search over a queue capped at `beam_width`.
///
/// Neighbors are enqueued closest-to-target first (Manhattan distance), and
/// before every pop whatever sits past the width is dropped from the tail.
/// Dropped cells are forgotten, so the search is incomplete: it may exhaust
/// even though the target is reachable.
pub struct Beam {
    frontier: VecDeque<Position>,
    queued: FxHashSet<Position>,
    beam_width: usize,
    dropped: usize,
    progress: SearchProgress,
}

impl Beam {
    /// A width of zero is treated as one.
    pub fn new(grid: &mut Grid, beam_width: usize) -> Self {
        grid.reset_search();
        let start = grid.start();

        let mut queued = FxHashSet::default();
        queued.insert(start);

        Beam {
            frontier: VecDeque::from([start]),
            queued,
            beam_width: beam_width.max(1),
            dropped: 0,
            progress: SearchProgress::new(grid.target()),
        }
    }

    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    /// Cells discarded by the width cap so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn prune(&mut self) {
        while self.frontier.len() > self.beam_width {
            if let Some(pos) = self.frontier.pop_back() {
                self.queued.remove(&pos);
                self.dropped += 1;
            }
        }
    }

    fn frontier(&self) -> Vec<Position> {
        self.frontier.iter().copied().collect()
    }
}

impl Solver for Beam {
    fn name(&self) -> String {
        format!("Beam Search (width {})", self.beam_width)
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.progress.begin_step();

        loop {
            self.prune();
            let Some(current) = self.frontier.pop_front() else {
                return self.progress.fail(Vec::new());
            };

            self.queued.remove(&current);
            if !self.progress.pop(current) {
                continue;
            }

            if current == self.progress.target {
                let path = reconstruct_path(grid, current);
                let frontier = self.frontier();
                return self.progress.succeed(frontier, path);
            }

            let target = self.progress.target;
            let mut neighbors = grid.neighbors(&current);
            neighbors.sort_by_key(|pos| pos.manhattan(&target));

            for neighbor in neighbors {
                if !self.progress.is_visited(&neighbor) && self.queued.insert(neighbor) {
                    link(grid, neighbor, current);
                    self.frontier.push_back(neighbor);
                }
            }

            return self.progress.searching(self.frontier());
        }
    }

    fn stats(&self) -> SolverStats {
        self.progress.stats
    }

    fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}

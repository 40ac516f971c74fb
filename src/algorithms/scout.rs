use crate::algorithms::common::{link, reconstruct_path, SearchProgress, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use log::debug;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub const DEFAULT_BFS_LAYERS: usize = 5;
pub const DEFAULT_DFS_LAYERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoutMode {
    /// Dequeue from the front.
    Breadth,
    /// Dequeue from the back.
    Depth,
}

/// "Scan wide, then drill deep": one queue whose dequeue end flips between
/// FIFO and LIFO as the search gets deeper.
///
/// The search starts in breadth mode and switches to depth mode once an
/// expanded node sits at depth `bfs_layers` or deeper. It returns to breadth
/// mode at depth `bfs_layers + dfs_layers`. Both thresholds are fixed, so
/// past that depth every productive expansion flips the mode.
pub struct Scout {
    frontier: VecDeque<Position>,
    queued: FxHashSet<Position>,
    mode: ScoutMode,
    bfs_layers: usize,
    dfs_layers: usize,
    switches: usize,
    progress: SearchProgress,
}

impl Scout {
    pub fn new(grid: &mut Grid, bfs_layers: usize, dfs_layers: usize) -> Self {
        grid.reset_search();
        let start = grid.start();

        let mut queued = FxHashSet::default();
        queued.insert(start);

        Scout {
            frontier: VecDeque::from([start]),
            queued,
            mode: ScoutMode::Breadth,
            bfs_layers,
            dfs_layers,
            switches: 0,
            progress: SearchProgress::new(grid.target()),
        }
    }

    pub fn mode(&self) -> ScoutMode {
        self.mode
    }

    /// Number of mode changes so far.
    pub fn switches(&self) -> usize {
        self.switches
    }

    fn update_mode(&mut self, depth: usize) {
        match self.mode {
            ScoutMode::Breadth if depth >= self.bfs_layers => {
                self.mode = ScoutMode::Depth;
            }
            ScoutMode::Depth if depth >= self.bfs_layers + self.dfs_layers => {
                self.mode = ScoutMode::Breadth;
            }
            _ => return,
        }
        self.switches += 1;
        debug!("scout: switched to {:?} mode at depth {}", self.mode, depth);
    }

    fn frontier(&self) -> Vec<Position> {
        self.frontier.iter().copied().collect()
    }
}

impl Solver for Scout {
    fn name(&self) -> String {
        format!(
            "Scout Algorithm (BFS:{}/DFS:{})",
            self.bfs_layers, self.dfs_layers
        )
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.progress.begin_step();

        loop {
            let next = match self.mode {
                ScoutMode::Breadth => self.frontier.pop_front(),
                ScoutMode::Depth => self.frontier.pop_back(),
            };
            let Some(current) = next else {
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

            let mut added = false;
            for neighbor in grid.neighbors(&current) {
                if !self.progress.is_visited(&neighbor) && self.queued.insert(neighbor) {
                    link(grid, neighbor, current);
                    self.frontier.push_back(neighbor);
                    added = true;
                }
            }

            if added {
                self.update_mode(grid.depth_of(current));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(scout: &mut Scout, grid: &mut Grid) -> Snapshot {
        loop {
            let snapshot = scout.advance(grid);
            if snapshot.is_terminal() {
                return snapshot;
            }
        }
    }

    #[test]
    fn starts_in_breadth_mode() {
        let mut grid = Grid::with_endpoints(10, 10, Position::new(0, 0), Position::new(9, 9)).unwrap();
        let scout = Scout::new(&mut grid, DEFAULT_BFS_LAYERS, DEFAULT_DFS_LAYERS);
        assert_eq!(scout.mode(), ScoutMode::Breadth);
        assert_eq!(scout.name(), "Scout Algorithm (BFS:5/DFS:5)");
    }

    #[test]
    fn switches_at_fixed_depths() {
        // A corridor makes depth equal to the column index, one node per step.
        let mut grid = Grid::with_endpoints(1, 14, Position::new(0, 0), Position::new(0, 13)).unwrap();
        let mut scout = Scout::new(&mut grid, 2, 3);

        let modes: Vec<ScoutMode> = (0..8)
            .map(|_| {
                scout.advance(&mut grid);
                scout.mode()
            })
            .collect();

        use ScoutMode::{Breadth, Depth};
        // Depths 0..=7: depth mode from 2, breadth again at 5, then a flip
        // on every expansion since 6 >= 2 and 7 >= 5.
        assert_eq!(
            modes,
            vec![Breadth, Breadth, Depth, Depth, Depth, Breadth, Depth, Breadth]
        );
        assert_eq!(scout.switches(), 4);
    }

    #[test]
    fn finds_far_target() {
        let mut grid = Grid::with_endpoints(10, 10, Position::new(0, 0), Position::new(9, 9)).unwrap();
        let mut scout = Scout::new(&mut grid, 3, 3);

        let path = finish(&mut scout, &mut grid).path.unwrap();

        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(9, 9)));
        assert!(scout.switches() > 0);
        assert!(scout.stats().steps > 0);
    }

    #[test]
    fn dead_end_exhausts() {
        let mut grid = Grid::with_endpoints(3, 3, Position::new(0, 0), Position::new(2, 2)).unwrap();
        for pos in [Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)] {
            grid.toggle_blocked(pos, true);
        }
        let mut scout = Scout::new(&mut grid, 1, 1);

        let snapshot = finish(&mut scout, &mut grid);

        assert!(snapshot.is_exhausted());
        assert_eq!(snapshot.visited.len(), 1);
    }
}

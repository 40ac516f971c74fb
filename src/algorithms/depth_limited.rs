use crate::algorithms::common::{link, reconstruct_path, SearchProgress, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use log::debug;
use rustc_hash::FxHashSet;

pub const DEFAULT_DEPTH_LIMIT: usize = 20;
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// DFS that refuses to expand nodes at or beyond `limit`.
///
/// Running out of nodes under the limit is reported as an exhausted
/// snapshot, the same way an unreachable target is.
pub struct DepthLimited {
    stack: Vec<Position>,
    queued: FxHashSet<Position>,
    limit: usize,
    cut_off: bool,
    progress: SearchProgress,
}

impl DepthLimited {
    pub fn new(grid: &mut Grid, limit: usize) -> Self {
        grid.reset_search();
        let start = grid.start();

        let mut queued = FxHashSet::default();
        queued.insert(start);

        DepthLimited {
            stack: vec![start],
            queued,
            limit,
            cut_off: false,
            progress: SearchProgress::new(grid.target()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the limit has kept an unseen cell out of the search so far.
    pub fn cut_off(&self) -> bool {
        self.cut_off
    }
}

impl Solver for DepthLimited {
    fn name(&self) -> String {
        format!("Depth-Limited Search (limit {})", self.limit)
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.progress.begin_step();

        while let Some(current) = self.stack.pop() {
            self.queued.remove(&current);
            if !self.progress.pop(current) {
                continue;
            }

            if current == self.progress.target {
                let path = reconstruct_path(grid, current);
                return self.progress.succeed(self.stack.clone(), path);
            }

            if grid.depth_of(current) < self.limit {
                for neighbor in grid.neighbors(&current).into_iter().rev() {
                    if !self.progress.is_visited(&neighbor) && self.queued.insert(neighbor) {
                        link(grid, neighbor, current);
                        self.stack.push(neighbor);
                    }
                }
            } else if grid
                .neighbors(&current)
                .iter()
                .any(|n| !self.progress.is_visited(n) && !self.queued.contains(n))
            {
                self.cut_off = true;
            }

            return self.progress.searching(self.stack.clone());
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

/// Iterative deepening: depth-limited passes with limits `1..=max_depth`.
///
/// The node table is reset between passes. When a pass runs dry the next
/// one starts inside the same `advance` call, so every returned snapshot
/// reflects an actual expansion. A pass that ran dry without the limit
/// holding anything back ends the search, since deeper passes would repeat it.
pub struct IterativeDeepening {
    pass: DepthLimited,
    max_depth: usize,
    earlier_steps: usize,
    finished: bool,
}

impl IterativeDeepening {
    /// `max_depth` below one is treated as one.
    pub fn new(grid: &mut Grid, max_depth: usize) -> Self {
        IterativeDeepening {
            pass: DepthLimited::new(grid, 1),
            max_depth: max_depth.max(1),
            earlier_steps: 0,
            finished: false,
        }
    }

    /// Limit of the pass currently running.
    pub fn current_limit(&self) -> usize {
        self.pass.limit()
    }
}

impl Solver for IterativeDeepening {
    fn name(&self) -> String {
        format!("Iterative Deepening DFS (max depth {})", self.max_depth)
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        assert!(!self.finished, "advance called on a finished search");

        loop {
            let snapshot = self.pass.advance(grid);
            if !snapshot.is_exhausted() {
                self.finished = snapshot.is_terminal();
                return snapshot;
            }

            let limit = self.pass.limit();
            if limit >= self.max_depth || !self.pass.cut_off() {
                self.finished = true;
                return snapshot;
            }

            debug!("iddfs: limit {} exhausted, deepening to {}", limit, limit + 1);
            self.earlier_steps += self.pass.stats().steps;
            self.pass = DepthLimited::new(grid, limit + 1);
        }
    }

    fn stats(&self) -> SolverStats {
        let pass = self.pass.stats();
        SolverStats {
            steps: self.earlier_steps + pass.steps,
            path_length: pass.path_length,
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish<S: Solver>(solver: &mut S, grid: &mut Grid) -> (Snapshot, usize) {
        let mut calls = 0;
        loop {
            calls += 1;
            let snapshot = solver.advance(grid);
            if snapshot.is_terminal() {
                return (snapshot, calls);
            }
        }
    }

    /// A one-row corridor: the target is exactly five moves away.
    fn corridor() -> Grid {
        Grid::with_endpoints(1, 6, Position::new(0, 0), Position::new(0, 5)).unwrap()
    }

    #[test]
    fn limit_below_required_depth_exhausts() {
        let mut grid = corridor();
        let mut dls = DepthLimited::new(&mut grid, 3);

        let (snapshot, calls) = finish(&mut dls, &mut grid);

        assert_eq!(snapshot.path, Some(vec![]));
        assert!(calls <= grid.cell_count() + 1);
        assert!(!snapshot.visited.contains(&Position::new(0, 4)));
        assert_eq!(grid.depth_of(Position::new(0, 3)), 3);
    }

    #[test]
    fn limit_at_required_depth_succeeds() {
        let mut grid = corridor();
        let mut dls = DepthLimited::new(&mut grid, 5);

        let (snapshot, _) = finish(&mut dls, &mut grid);

        assert_eq!(snapshot.path.map(|p| p.len()), Some(6));
        assert_eq!(dls.name(), "Depth-Limited Search (limit 5)");
    }

    #[test]
    fn default_limit_reaches_nearby_target() {
        let mut grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(2, 2)).unwrap();
        let mut dls = DepthLimited::new(&mut grid, DEFAULT_DEPTH_LIMIT);
        let (snapshot, _) = finish(&mut dls, &mut grid);
        assert!(snapshot.is_success());
    }

    #[test]
    fn iddfs_deepens_until_found() {
        let mut grid = corridor();
        let mut iddfs = IterativeDeepening::new(&mut grid, 5);

        let (snapshot, _) = finish(&mut iddfs, &mut grid);

        assert_eq!(
            snapshot.path,
            Some((0..6).map(|col| Position::new(0, col)).collect())
        );
        assert_eq!(iddfs.current_limit(), 5);
        assert!(iddfs.is_finished());
        // Passes with limits 1..=4 pop 2, 3, 4 and 5 nodes, the final one 6.
        assert_eq!(iddfs.stats().steps, 2 + 3 + 4 + 5 + 6);
        assert_eq!(iddfs.stats().path_length, 6);
    }

    #[test]
    fn iddfs_gives_up_after_max_depth() {
        let mut grid = corridor();
        let mut iddfs = IterativeDeepening::new(&mut grid, 3);

        let (snapshot, _) = finish(&mut iddfs, &mut grid);

        assert!(snapshot.is_exhausted());
        assert_eq!(iddfs.current_limit(), 3);
    }

    #[test]
    fn iddfs_stops_once_the_limit_hides_nothing() {
        let mut grid = corridor();
        grid.toggle_blocked(Position::new(0, 3), true);
        let mut iddfs = IterativeDeepening::new(&mut grid, DEFAULT_MAX_DEPTH);

        let (snapshot, _) = finish(&mut iddfs, &mut grid);

        assert!(snapshot.is_exhausted());
        // Limit 1 holds back (0, 2); limit 2 reaches every open cell.
        assert_eq!(iddfs.current_limit(), 2);
        assert_eq!(iddfs.stats().steps, 2 + 3);
    }

    #[test]
    fn dls_reports_cut_off() {
        let mut grid = corridor();
        let mut shallow = DepthLimited::new(&mut grid, 2);
        finish(&mut shallow, &mut grid);
        assert!(shallow.cut_off());

        let mut deep = DepthLimited::new(&mut grid, 5);
        finish(&mut deep, &mut grid);
        assert!(!deep.cut_off());
    }

    #[test]
    fn iddfs_open_grid() {
        let mut grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(4, 4)).unwrap();
        let mut iddfs = IterativeDeepening::new(&mut grid, DEFAULT_MAX_DEPTH);
        let (snapshot, _) = finish(&mut iddfs, &mut grid);
        let path = snapshot.path.unwrap();
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(4, 4)));
    }
}

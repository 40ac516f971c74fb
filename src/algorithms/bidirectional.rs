use crate::algorithms::common::{link, reconstruct_path, trace_parents, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    Target,
}

/// Two breadth-first searches, one from each endpoint, meeting in the middle.
///
/// Each `advance` expands one node on the start side and then one on the
/// target side, and every expansion counts as a step. Nodes count as visited by a side as soon as that side
/// discovers them. Start side parents live in the grid's node table; target
/// side parents are kept here so the two halves never overwrite each other.
pub struct Bidirectional {
    start: Position,
    target: Position,
    start_frontier: VecDeque<Position>,
    target_frontier: VecDeque<Position>,
    start_visited: FxHashSet<Position>,
    target_visited: FxHashSet<Position>,
    target_parents: FxHashMap<Position, Position>,
    stats: SolverStats,
    finished: bool,
}

impl Bidirectional {
    pub fn new(grid: &mut Grid) -> Self {
        grid.reset_search();
        let start = grid.start();
        let target = grid.target();

        Bidirectional {
            start,
            target,
            start_frontier: VecDeque::from([start]),
            target_frontier: VecDeque::from([target]),
            start_visited: FxHashSet::from_iter([start]),
            target_visited: FxHashSet::from_iter([target]),
            target_parents: FxHashMap::default(),
            stats: SolverStats::default(),
            finished: false,
        }
    }

    /// Pops one node from `side` and discovers its neighbors. Returns the
    /// meeting point if one of them was already seen by the other side.
    fn expand(&mut self, grid: &mut Grid, side: Side) -> Option<Position> {
        let (frontier, visited, other) = match side {
            Side::Start => (
                &mut self.start_frontier,
                &mut self.start_visited,
                &self.target_visited,
            ),
            Side::Target => (
                &mut self.target_frontier,
                &mut self.target_visited,
                &self.start_visited,
            ),
        };

        let current = frontier.pop_front()?;
        self.stats.steps += 1;
        for neighbor in grid.neighbors(&current) {
            if !visited.insert(neighbor) {
                continue;
            }
            match side {
                Side::Start => link(grid, neighbor, current),
                Side::Target => {
                    self.target_parents.insert(neighbor, current);
                }
            }
            frontier.push_back(neighbor);

            if other.contains(&neighbor) {
                return Some(neighbor);
            }
        }
        None
    }

    /// start -> meeting point through the grid, then meeting point -> target
    /// through the target side links.
    fn join_at(&self, grid: &Grid, meeting: Position) -> Vec<Position> {
        let mut path = reconstruct_path(grid, meeting);
        let mut toward_target = trace_parents(meeting, grid.cell_count(), |pos| {
            self.target_parents.get(&pos).copied()
        });
        toward_target.reverse();
        path.extend(toward_target.into_iter().skip(1));
        path
    }

    fn frontier(&self) -> Vec<Position> {
        self.start_frontier
            .iter()
            .chain(self.target_frontier.iter())
            .copied()
            .collect()
    }

    fn visited(&self) -> FxHashSet<Position> {
        self.start_visited
            .union(&self.target_visited)
            .copied()
            .collect()
    }

    fn finish(&mut self, path: Vec<Position>) -> Snapshot {
        self.finished = true;
        self.stats.path_length = path.len();
        Snapshot {
            frontier: self.frontier(),
            visited: self.visited(),
            path: Some(path),
        }
    }
}

impl Solver for Bidirectional {
    fn name(&self) -> String {
        "Bidirectional Search".to_string()
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        assert!(!self.finished, "advance called on a finished search");

        if self.start == self.target {
            self.stats.steps += 1;
            return self.finish(vec![self.start]);
        }
        if self.start_frontier.is_empty() || self.target_frontier.is_empty() {
            return self.finish(Vec::new());
        }

        for side in [Side::Start, Side::Target] {
            if let Some(meeting) = self.expand(grid, side) {
                let path = self.join_at(grid, meeting);
                return self.finish(path);
            }
        }

        Snapshot::searching(self.frontier(), self.visited())
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(solver: &mut Bidirectional, grid: &mut Grid) -> Snapshot {
        loop {
            let snapshot = solver.advance(grid);
            if snapshot.is_terminal() {
                return snapshot;
            }
        }
    }

    fn assert_walkable(grid: &Grid, path: &[Position]) {
        for pair in path.windows(2) {
            assert!(
                grid.neighbors(&pair[0]).contains(&pair[1]),
                "{:?} -> {:?} is not a move",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn meeting_path_covers_both_halves() {
        let mut grid = Grid::with_endpoints(7, 7, Position::new(0, 0), Position::new(6, 6)).unwrap();
        let mut search = Bidirectional::new(&mut grid);

        let path = finish(&mut search, &mut grid).path.unwrap();

        // The start-side half alone would stop at the meeting point.
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(6, 6)));
        assert_walkable(&grid, &path);
        let unique: FxHashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn adjacent_endpoints_meet_immediately() {
        let mut grid = Grid::with_endpoints(3, 3, Position::new(1, 1), Position::new(1, 2)).unwrap();
        let mut search = Bidirectional::new(&mut grid);

        let snapshot = search.advance(&mut grid);

        assert_eq!(
            snapshot.path,
            Some(vec![Position::new(1, 1), Position::new(1, 2)])
        );
        assert_eq!(search.stats().path_length, 2);
        // The start side met the target before the target side popped.
        assert_eq!(search.stats().steps, 1);
    }

    #[test]
    fn identical_endpoints() {
        let mut grid = Grid::with_endpoints(2, 2, Position::new(0, 0), Position::new(0, 0)).unwrap();
        let mut search = Bidirectional::new(&mut grid);
        assert_eq!(search.advance(&mut grid).path, Some(vec![Position::new(0, 0)]));
    }

    #[test]
    fn separated_endpoints_exhaust() {
        let mut grid = Grid::with_endpoints(4, 5, Position::new(0, 0), Position::new(3, 4)).unwrap();
        for row in 0..4 {
            grid.toggle_blocked(Position::new(row, 2), true);
        }
        let mut search = Bidirectional::new(&mut grid);

        let snapshot = finish(&mut search, &mut grid);

        assert!(snapshot.is_exhausted());
        assert!(search.is_finished());
    }

    #[test]
    fn snapshot_merges_both_sides() {
        let mut grid = Grid::with_endpoints(9, 9, Position::new(0, 0), Position::new(8, 8)).unwrap();
        let mut search = Bidirectional::new(&mut grid);

        let snapshot = search.advance(&mut grid);

        assert!(snapshot.visited.contains(&Position::new(0, 0)));
        assert!(snapshot.visited.contains(&Position::new(8, 8)));
        assert!(snapshot.visited.contains(&Position::new(1, 1)));
        assert!(snapshot.visited.contains(&Position::new(7, 7)));
        assert_eq!(snapshot.frontier.len(), 6);
        assert_eq!(search.stats().steps, 2);
    }
}

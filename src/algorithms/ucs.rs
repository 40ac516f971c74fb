use crate::algorithms::common::{
    link, reconstruct_path, step_cost, SearchProgress, Solver, SolverStats,
};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority queue entry. Ordered in reverse so the `BinaryHeap` pops the
/// cheapest entry first, and among equal costs the earliest inserted one.
#[derive(Debug, Clone, Copy)]
struct Entry {
    cost: f64,
    seq: u64,
    pos: Position,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Uniform-cost search with 1.0 orthogonal and 1.414 diagonal step costs.
///
/// A cheaper route to a node that is still queued pushes a second entry
/// instead of decreasing the key. The stale entry is dropped when popped,
/// because by then the node is already visited.
pub struct Ucs {
    heap: BinaryHeap<Entry>,
    queued: FxHashSet<Position>,
    next_seq: u64,
    progress: SearchProgress,
}

impl Ucs {
    pub fn new(grid: &mut Grid) -> Self {
        grid.reset_search();
        let start = grid.start();
        if let Some(node) = grid.node_mut(start) {
            node.cost = 0.0;
        }

        let mut ucs = Ucs {
            heap: BinaryHeap::new(),
            queued: FxHashSet::default(),
            next_seq: 0,
            progress: SearchProgress::new(grid.target()),
        };
        ucs.push(start, 0.0);
        ucs
    }

    fn push(&mut self, pos: Position, cost: f64) {
        self.heap.push(Entry {
            cost,
            seq: self.next_seq,
            pos,
        });
        self.next_seq += 1;
        self.queued.insert(pos);
    }

    /// Queued positions by (cost, insertion order), one entry per position.
    fn frontier(&self) -> Vec<Position> {
        let mut entries: Vec<Entry> = self
            .heap
            .iter()
            .filter(|entry| self.queued.contains(&entry.pos))
            .copied()
            .collect();
        // `Entry` ranks the cheapest as greatest, so sort descending.
        entries.sort_unstable_by(|a, b| b.cmp(a));

        let mut seen = FxHashSet::default();
        entries
            .into_iter()
            .filter(|entry| seen.insert(entry.pos))
            .map(|entry| entry.pos)
            .collect()
    }
}

impl Solver for Ucs {
    fn name(&self) -> String {
        "Uniform-Cost Search (UCS)".to_string()
    }

    fn advance(&mut self, grid: &mut Grid) -> Snapshot {
        self.progress.begin_step();

        while let Some(Entry { cost, pos: current, .. }) = self.heap.pop() {
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
                if self.progress.is_visited(&neighbor) {
                    continue;
                }
                let new_cost = cost + step_cost(&current, &neighbor);
                let queued = self.queued.contains(&neighbor);

                if !queued || new_cost < grid.cost_of(neighbor) {
                    link(grid, neighbor, current);
                    if let Some(node) = grid.node_mut(neighbor) {
                        node.cost = new_cost;
                    }
                    self.push(neighbor, new_cost);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::path_cost;

    fn finish(ucs: &mut Ucs, grid: &mut Grid) -> Snapshot {
        loop {
            let snapshot = ucs.advance(grid);
            if snapshot.is_terminal() {
                return snapshot;
            }
        }
    }

    #[test]
    fn heap_pops_cheapest_then_oldest() {
        let mut heap = BinaryHeap::new();
        let p = Position::new(0, 0);
        heap.push(Entry { cost: 2.0, seq: 0, pos: p });
        heap.push(Entry { cost: 1.0, seq: 2, pos: p });
        heap.push(Entry { cost: 1.0, seq: 1, pos: p });

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|e| e.seq).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn frontier_is_ordered_by_cost() {
        let mut grid = Grid::with_endpoints(5, 5, Position::new(2, 2), Position::new(0, 4)).unwrap();
        let mut ucs = Ucs::new(&mut grid);

        let snapshot = ucs.advance(&mut grid);

        assert_eq!(
            snapshot.frontier,
            vec![
                Position::new(1, 2),
                Position::new(2, 3),
                Position::new(3, 2),
                Position::new(2, 1),
                Position::new(3, 3),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn diagonal_route_is_cheapest_on_open_grid() {
        let mut grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(4, 4)).unwrap();
        let mut ucs = Ucs::new(&mut grid);

        let path = finish(&mut ucs, &mut grid).path.unwrap();

        assert_eq!(path.len(), 5);
        assert!((path_cost(&path) - 4.0 * 1.414).abs() < 1e-9);
        assert!((grid.cost_of(Position::new(4, 4)) - 4.0 * 1.414).abs() < 1e-9);
    }

    #[test]
    fn repeated_runs_agree() {
        let mut grid = Grid::with_endpoints(12, 12, Position::new(1, 1), Position::new(10, 7)).unwrap();
        grid.generate_random_walls(0.25, Some(99)).unwrap();

        let mut first = Ucs::new(&mut grid);
        let a = finish(&mut first, &mut grid);
        let mut second = Ucs::new(&mut grid);
        let b = finish(&mut second, &mut grid);

        assert_eq!(a.path, b.path);
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn anti_diagonal_costs_two_orthogonal_moves() {
        // Down-Left is not part of the neighbor rule.
        let mut grid = Grid::with_endpoints(2, 2, Position::new(0, 1), Position::new(1, 0)).unwrap();
        let mut ucs = Ucs::new(&mut grid);

        let path = finish(&mut ucs, &mut grid).path.unwrap();

        assert_eq!(path.len(), 3);
        assert!((path_cost(&path) - 2.0).abs() < 1e-9);
    }
}

use crate::algorithms::common::{link, reconstruct_path, SearchProgress, Solver, SolverStats};
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashSet;

enum Expansion {
    /// Neighbors pushed in reverse so the first one is expanded first.
    Ordered,
    /// Neighbors shuffled before every push.
    Shuffled(StdRng),
}

/// Depth-first search over a LIFO stack, optionally with shuffled expansion.
pub struct Dfs {
    stack: Vec<Position>,
    queued: FxHashSet<Position>,
    expansion: Expansion,
    progress: SearchProgress,
}

impl Dfs {
    pub fn new(grid: &mut Grid) -> Self {
        Self::with_expansion(grid, Expansion::Ordered)
    }

    /// Randomized DFS. A fixed `seed` makes the walk reproducible.
    pub fn randomized(grid: &mut Grid, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_expansion(grid, Expansion::Shuffled(rng))
    }

    fn with_expansion(grid: &mut Grid, expansion: Expansion) -> Self {
        grid.reset_search();
        let start = grid.start();

        let mut queued = FxHashSet::default();
        queued.insert(start);

        Dfs {
            stack: vec![start],
            queued,
            expansion,
            progress: SearchProgress::new(grid.target()),
        }
    }

    pub fn is_randomized(&self) -> bool {
        matches!(self.expansion, Expansion::Shuffled(_))
    }
}

impl Solver for Dfs {
    fn name(&self) -> String {
        if self.is_randomized() {
            "Randomized DFS (Chaos Mode)".to_string()
        } else {
            "Depth-First Search (DFS)".to_string()
        }
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

            let mut neighbors = grid.neighbors(&current);
            match &mut self.expansion {
                Expansion::Ordered => neighbors.reverse(),
                Expansion::Shuffled(rng) => neighbors.shuffle(rng),
            }

            for neighbor in neighbors {
                if !self.progress.is_visited(&neighbor) && self.queued.insert(neighbor) {
                    link(grid, neighbor, current);
                    self.stack.push(neighbor);
                }
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

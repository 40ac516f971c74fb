use crate::error::GridError;
use crate::node::SearchNode;
use crate::snapshot::Snapshot;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn chebyshev(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// True when `other` is one diagonal step away.
    pub fn is_diagonal_to(&self, other: &Position) -> bool {
        self.row.abs_diff(other.row) == 1 && self.col.abs_diff(other.col) == 1
    }
}

/// Expansion order: Up, Right, Down, Down-Right, Left, Up-Left.
///
/// Only the main diagonal is included, so this is not 8-connectivity.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Blocked,
}

impl Cell {
    pub fn is_blocked(self) -> bool {
        self == Cell::Blocked
    }
}

/// The occupancy grid plus the per-cell search bookkeeping table.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
    nodes: Vec<Vec<SearchNode>>,
    start: Position,
    target: Position,
}

impl Grid {
    /// Creates an open grid with start at `(rows/4, cols/4)` and target at
    /// `(rows/4, 3*cols/4)`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let start = Position::new(rows / 4, cols / 4);
        let target = Position::new(rows / 4, 3 * cols / 4);
        Self::with_endpoints(rows, cols, start, target)
    }

    pub fn with_endpoints(
        rows: usize,
        cols: usize,
        start: Position,
        target: Position,
    ) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        for pos in [start, target] {
            if pos.row >= rows || pos.col >= cols {
                return Err(GridError::OutOfBounds(pos));
            }
        }

        Ok(Grid {
            rows,
            cols,
            cells: vec![vec![Cell::Open; cols]; rows],
            nodes: vec![vec![SearchNode::new(); cols]; rows],
            start,
            target,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Out-of-bounds positions are reported as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.cell(pos).map_or(true, Cell::is_blocked)
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    pub fn blocked_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_blocked())
            .count()
    }

    pub fn node(&self, pos: Position) -> Option<&SearchNode> {
        self.nodes.get(pos.row)?.get(pos.col)
    }

    pub fn node_mut(&mut self, pos: Position) -> Option<&mut SearchNode> {
        self.nodes.get_mut(pos.row)?.get_mut(pos.col)
    }

    pub fn parent_of(&self, pos: Position) -> Option<Position> {
        self.node(pos).and_then(|node| node.parent)
    }

    pub fn depth_of(&self, pos: Position) -> usize {
        self.node(pos).map_or(0, |node| node.depth)
    }

    pub fn cost_of(&self, pos: Position) -> f64 {
        self.node(pos).map_or(f64::INFINITY, |node| node.cost)
    }

    /// Open neighbors of `pos` in [`NEIGHBOR_OFFSETS`] order. Blocked and
    /// out-of-bounds candidates are skipped silently.
    pub fn neighbors(&self, pos: &Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
        let (row, col) = (pos.row as isize, pos.col as isize);

        for (dr, dc) in NEIGHBOR_OFFSETS {
            let nr = row + dr;
            let nc = col + dc;

            if nr >= 0 && nr < self.rows as isize && nc >= 0 && nc < self.cols as isize {
                let next = Position::new(nr as usize, nc as usize);
                if !self.cells[next.row][next.col].is_blocked() {
                    neighbors.push(next);
                }
            }
        }
        neighbors
    }

    /// Moves the start. Fails without mutation when `pos` is out of bounds
    /// or is the current target. A wall under the new start is removed.
    pub fn set_start(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || pos == self.target {
            warn!("rejected start placement at ({}, {})", pos.row, pos.col);
            return false;
        }
        self.cells[pos.row][pos.col] = Cell::Open;
        self.start = pos;
        true
    }

    /// Moves the target. Same rules as [`Grid::set_start`].
    pub fn set_target(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || pos == self.start {
            warn!("rejected target placement at ({}, {})", pos.row, pos.col);
            return false;
        }
        self.cells[pos.row][pos.col] = Cell::Open;
        self.target = pos;
        true
    }

    /// Places or removes a wall. Endpoints and out-of-bounds cells are refused.
    pub fn toggle_blocked(&mut self, pos: Position, blocked: bool) -> bool {
        if !self.in_bounds(pos) || pos == self.start || pos == self.target {
            return false;
        }
        self.cells[pos.row][pos.col] = if blocked { Cell::Blocked } else { Cell::Open };
        true
    }

    /// Clears every node's search attributes. Walls and endpoints survive.
    pub fn reset_search(&mut self) {
        for node in self.nodes.iter_mut().flatten() {
            node.reset();
        }
    }

    /// Removes every wall and resets search state.
    pub fn clear_all(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = Cell::Open;
        }
        self.reset_search();
    }

    /// Rebuilds the grid with new dimensions. Walls inside the overlap are
    /// kept and endpoints are clamped into the new bounds.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }

        let mut cells = vec![vec![Cell::Open; cols]; rows];
        for (r, row) in cells.iter_mut().enumerate().take(self.rows) {
            for (c, cell) in row.iter_mut().enumerate().take(self.cols) {
                *cell = self.cells[r][c];
            }
        }

        let clamp = |pos: Position| Position::new(pos.row.min(rows - 1), pos.col.min(cols - 1));
        self.start = clamp(self.start);
        self.target = clamp(self.target);
        cells[self.start.row][self.start.col] = Cell::Open;
        cells[self.target.row][self.target.col] = Cell::Open;

        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
        self.nodes = vec![vec![SearchNode::new(); cols]; rows];
        Ok(())
    }

    /// Fills roughly `density` of the grid with walls, keeping a one-cell
    /// ring around both endpoints free. Existing walls are cleared first.
    ///
    /// Gives up after `2 * cell_count` draws and returns how many walls were
    /// actually placed. Connectivity between the endpoints is not checked.
    pub fn generate_random_walls(
        &mut self,
        density: f64,
        seed: Option<u64>,
    ) -> Result<usize, GridError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.clear_all();

        let total_cells = self.cell_count();
        let wanted = (total_cells as f64 * density) as usize;
        let max_attempts = total_cells * 2;

        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < wanted && attempts < max_attempts {
            attempts += 1;
            let pos = Position::new(rng.gen_range(0..self.rows), rng.gen_range(0..self.cols));

            if pos.chebyshev(&self.start) <= 1 || pos.chebyshev(&self.target) <= 1 {
                continue;
            }
            if self.cells[pos.row][pos.col].is_blocked() {
                continue;
            }

            self.cells[pos.row][pos.col] = Cell::Blocked;
            walls_placed += 1;
        }

        debug!(
            "generated {} random walls ({:.1}% of grid) in {} attempts",
            walls_placed,
            walls_placed as f64 / total_cells as f64 * 100.0,
            attempts
        );
        Ok(walls_placed)
    }

    /// Text picture of the grid, optionally overlaid with a search snapshot.
    pub fn render(&self, snapshot: Option<&Snapshot>) -> String {
        let mut out = String::new();
        out.push_str("Legend: S=Start, T=Target, #=Wall, *=Path, o=Frontier, .=Visited\n");

        out.push_str("   ");
        for col in 0..self.cols {
            out.push_str(&format!("{:2}", col % 10));
        }
        out.push('\n');

        let path = snapshot.and_then(|s| s.path.as_deref()).unwrap_or(&[]);
        for row in 0..self.rows {
            out.push_str(&format!("{:2} ", row));
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let glyph = if pos == self.start {
                    'S'
                } else if pos == self.target {
                    'T'
                } else if self.cells[row][col].is_blocked() {
                    '#'
                } else if path.contains(&pos) {
                    '*'
                } else if snapshot.is_some_and(|s| s.frontier.contains(&pos)) {
                    'o'
                } else if snapshot.is_some_and(|s| s.visited.contains(&pos)) {
                    '.'
                } else {
                    ' '
                };
                out.push(' ');
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    pub fn print_grid(&self, snapshot: Option<&Snapshot>) {
        println!("{}", self.render(snapshot));
    }
}

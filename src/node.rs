use crate::grid::Position;

/// Per-cell transient search attributes.
///
/// One `SearchNode` exists for every cell of a [`Grid`](crate::grid::Grid). The
/// table is re-derived before each run and is independent of rendering state.
/// `parent` is a coordinate back-reference resolved through the grid's node
/// table; it never owns or keeps anything alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub parent: Option<Position>,
    pub cost: f64,
    pub depth: usize,
}

impl SearchNode {
    pub fn new() -> Self {
        SearchNode {
            parent: None,
            cost: f64::INFINITY,
            depth: 0,
        }
    }

    /// Clear everything a previous search wrote into this node.
    pub fn reset(&mut self) {
        *self = SearchNode::new();
    }

    /// True when no search has touched this node since the last reset.
    pub fn is_pristine(&self) -> bool {
        self.parent.is_none() && self.cost == f64::INFINITY && self.depth == 0
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::new()
    }
}

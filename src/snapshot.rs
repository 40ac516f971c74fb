use crate::grid::Position;
use rustc_hash::FxHashSet;

/// One externally observable state of a search, taken after a unit of work.
///
/// `path` encodes the outcome:
/// - `None`: still searching
/// - `Some(vec![])`: frontier exhausted, target unreachable
/// - `Some(path)`: success, `path[0]` is the start and the last element the target
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub frontier: Vec<Position>,
    pub visited: FxHashSet<Position>,
    pub path: Option<Vec<Position>>,
}

impl Snapshot {
    pub fn searching(frontier: Vec<Position>, visited: FxHashSet<Position>) -> Self {
        Snapshot {
            frontier,
            visited,
            path: None,
        }
    }

    pub fn found(frontier: Vec<Position>, visited: FxHashSet<Position>, path: Vec<Position>) -> Self {
        Snapshot {
            frontier,
            visited,
            path: Some(path),
        }
    }

    pub fn exhausted(frontier: Vec<Position>, visited: FxHashSet<Position>) -> Self {
        Snapshot {
            frontier,
            visited,
            path: Some(Vec::new()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.path.as_ref().is_some_and(|path| !path.is_empty())
    }

    pub fn is_exhausted(&self) -> bool {
        self.path.as_ref().is_some_and(Vec::is_empty)
    }

    /// Number of cells on the path, zero while searching or on failure.
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }
}

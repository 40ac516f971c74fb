//! Error types for grid construction, the simulation driver and CLI config.
//!
//! Editor commands (`set_start`, `toggle_blocked`, ...) report invalid
//! coordinates with a `false` return instead of an error. These enums cover
//! everything else.

use crate::grid::Position;

/// Errors raised while building or reshaping a [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Both dimensions must be at least one cell.
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Wall density has to lie in `[0, 1]`.
    #[error("wall density must be within [0, 1], got {0}")]
    InvalidDensity(f64),

    /// An explicit endpoint was outside the grid.
    #[error("position ({}, {}) is outside the grid", .0.row, .0.col)]
    OutOfBounds(Position),
}

/// Errors raised by the [`Simulation`](crate::simulation::Simulation) driver.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Grid topology may not change while a search holds an in-progress run.
    #[error("cannot edit the grid while a search is in progress")]
    SearchInProgress,

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors found while validating command line configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for --{name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

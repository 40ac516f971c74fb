//! Steppable grid pathfinding: nine search strategies that each expose
//! their progress one snapshot at a time, plus the grid they run on, a
//! bounded rewind history and a driver that ties them together.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod node;
pub mod simulation;
pub mod snapshot;
pub mod statistics;

//! The search strategies and the contract they share.

pub mod beam;
pub mod bfs;
pub mod bidirectional;
pub mod common;
pub mod depth_limited;
pub mod dfs;
pub mod scout;
pub mod strategy;
pub mod ucs;

pub use common::{path_cost, reconstruct_path, step_cost, Solver, SolverStats};
pub use strategy::{Algorithm, SolverParams, Strategy};

use crate::algorithms::depth_limited::{DEFAULT_DEPTH_LIMIT, DEFAULT_MAX_DEPTH};
use crate::algorithms::scout::{DEFAULT_BFS_LAYERS, DEFAULT_DFS_LAYERS};
use crate::algorithms::beam::DEFAULT_BEAM_WIDTH;
use crate::algorithms::{Algorithm, SolverParams};
use crate::error::{ConfigError, GridError};
use crate::grid::{Grid, Position};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 30)]
    pub rows: usize,

    #[arg(long, default_value_t = 40)]
    pub cols: usize,

    /// Defaults to rows / 4
    #[arg(long)]
    pub start_row: Option<usize>,

    /// Defaults to cols / 4
    #[arg(long)]
    pub start_col: Option<usize>,

    /// Defaults to rows / 4
    #[arg(long)]
    pub target_row: Option<usize>,

    /// Defaults to 3 * cols / 4
    #[arg(long)]
    pub target_col: Option<usize>,

    /// Fraction of cells to wall off
    #[arg(long, default_value_t = 0.3)]
    pub density: f64,

    /// Seed for wall generation and randomized DFS
    #[arg(long)]
    pub seed: Option<u64>,

    /// bfs, dfs, random_dfs, ucs, dls, iddfs, bidirectional, scout, beam or all
    #[arg(long, default_value = "bfs")]
    pub algorithm: String,

    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[arg(long, default_value_t = DEFAULT_BFS_LAYERS)]
    pub bfs_layers: usize,

    #[arg(long, default_value_t = DEFAULT_DFS_LAYERS)]
    pub dfs_layers: usize,

    #[arg(long, default_value_t = DEFAULT_BEAM_WIDTH)]
    pub beam_width: usize,

    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_capacity: usize,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Rewind this many steps after the run and print what the history holds
    #[arg(long, default_value_t = 0)]
    pub rewind: usize,

    // Batch simulation options
    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 10)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = 0.0)]
    pub min_density: f64,

    #[arg(long, default_value_t = 0.4)]
    pub max_density: f64,

    #[arg(long, default_value_t = 0.1)]
    pub density_step: f64,

    #[arg(long, default_value = "results.csv")]
    pub output_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["stepwise_search"])
    }
}

impl Config {
    /// Checks ranges that clap's type parsing cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            }
            .into());
        }
        check_density("density", self.density)?;
        check_density("min-density", self.min_density)?;
        check_density("max-density", self.max_density)?;
        if self.min_density > self.max_density {
            return Err(ConfigError::InvalidParameter {
                name: "min-density",
                reason: format!(
                    "{} is greater than --max-density {}",
                    self.min_density, self.max_density
                ),
            });
        }
        if self.density_step <= 0.0 || !self.density_step.is_finite() {
            return Err(invalid("density-step", "must be a positive number"));
        }
        if self.num_simulations == 0 {
            return Err(invalid("num-simulations", "must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history-capacity", "must be at least 1"));
        }
        if self.beam_width == 0 {
            return Err(invalid("beam-width", "must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(invalid("max-depth", "must be at least 1"));
        }

        let (start, target) = self.endpoints();
        for pos in [start, target] {
            if pos.row >= self.rows || pos.col >= self.cols {
                return Err(GridError::OutOfBounds(pos).into());
            }
        }

        self.algorithms()?;
        Ok(())
    }

    /// The algorithms selected by `--algorithm`. `all` expands to every one.
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        if self.algorithm.eq_ignore_ascii_case("all") {
            return Ok(Algorithm::ALL.to_vec());
        }
        self.algorithm
            .parse::<Algorithm>()
            .map(|algorithm| vec![algorithm])
            .map_err(|_| ConfigError::UnknownAlgorithm(self.algorithm.clone()))
    }

    pub fn runs_all_algorithms(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("all")
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            depth_limit: self.depth_limit,
            max_depth: self.max_depth,
            bfs_layers: self.bfs_layers,
            dfs_layers: self.dfs_layers,
            beam_width: self.beam_width,
            seed: self.seed,
        }
    }

    /// Start and target, filling in the defaults for any unset coordinate.
    pub fn endpoints(&self) -> (Position, Position) {
        let start = Position::new(
            self.start_row.unwrap_or(self.rows / 4),
            self.start_col.unwrap_or(self.cols / 4),
        );
        let target = Position::new(
            self.target_row.unwrap_or(self.rows / 4),
            self.target_col.unwrap_or(3 * self.cols / 4),
        );
        (start, target)
    }

    /// Builds the configured grid and fills it with random walls.
    pub fn build_grid(&self, density: f64, seed: Option<u64>) -> Result<Grid, GridError> {
        let (start, target) = self.endpoints();
        let mut grid = Grid::with_endpoints(self.rows, self.cols, start, target)?;
        if density > 0.0 {
            grid.generate_random_walls(density, seed)?;
        }
        Ok(grid)
    }
}

fn check_density(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} is outside [0, 1]", value),
        })
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["stepwise_search"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.solver_params(), SolverParams::default());
        assert_eq!(
            config.endpoints(),
            (Position::new(7, 10), Position::new(7, 30))
        );
    }

    #[test]
    fn explicit_endpoints_override_defaults() {
        let config = parse(&["--rows", "10", "--cols", "10", "--start-row", "0", "--target-col", "9"]);
        assert_eq!(
            config.endpoints(),
            (Position::new(0, 2), Position::new(2, 9))
        );
    }

    #[test]
    fn out_of_bounds_endpoint_is_rejected() {
        let config = parse(&["--rows", "5", "--cols", "5", "--target-row", "5"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Grid(GridError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert!(matches!(
            parse(&["--density", "1.5"]).validate(),
            Err(ConfigError::InvalidParameter { name: "density", .. })
        ));
        assert!(matches!(
            parse(&["--min-density", "0.5", "--max-density", "0.2"]).validate(),
            Err(ConfigError::InvalidParameter { name: "min-density", .. })
        ));
        assert!(matches!(
            parse(&["--density-step", "0"]).validate(),
            Err(ConfigError::InvalidParameter { name: "density-step", .. })
        ));
        assert!(matches!(
            parse(&["--rows", "0"]).validate(),
            Err(ConfigError::Grid(GridError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn algorithm_selection() {
        assert_eq!(parse(&["--algorithm", "all"]).algorithms().unwrap().len(), 9);
        assert_eq!(
            parse(&["--algorithm", "iddfs"]).algorithms().unwrap(),
            vec![Algorithm::IterativeDeepening]
        );
        assert!(matches!(
            parse(&["--algorithm", "dijkstra"]).validate(),
            Err(ConfigError::UnknownAlgorithm(name)) if name == "dijkstra"
        ));
    }

    #[test]
    fn built_grid_is_seeded() {
        let config = parse(&["--rows", "12", "--cols", "12"]);
        let a = config.build_grid(0.3, Some(7)).unwrap();
        let b = config.build_grid(0.3, Some(7)).unwrap();
        assert_eq!(a.render(None), b.render(None));
        assert!(a.blocked_count() > 0);
        assert_eq!(config.build_grid(0.0, None).unwrap().blocked_count(), 0);
    }
}

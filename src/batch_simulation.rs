use crate::algorithms::Algorithm;
use crate::config::Config;
use crate::error::SimulationError;
use crate::simulation::Simulation;
use crate::statistics::RunSummary;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::time::Instant;

const CSV_HEADER: &str = "simulation_id,algorithm,density,seed,walls,success,steps,nodes_visited,\
path_length,path_cost,optimal_path_length,route_efficiency,elapsed_us";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub algorithm: Algorithm,
    pub density: f64,
    pub seed: u64,
    pub walls: usize,
    pub success: bool,
    pub steps: usize,
    pub nodes_visited: usize,
    pub path_length: usize,
    pub path_cost: f64,
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: f64,
    pub elapsed_us: u128,
}

impl BatchResult {
    fn from_summary(
        simulation_id: usize,
        density: f64,
        seed: u64,
        walls: usize,
        summary: &RunSummary,
    ) -> Self {
        BatchResult {
            simulation_id,
            algorithm: summary.algorithm,
            density,
            seed,
            walls,
            success: summary.success,
            steps: summary.telemetry.steps,
            nodes_visited: summary.telemetry.nodes_visited,
            path_length: summary.telemetry.path_length,
            path_cost: summary.path_cost,
            optimal_path_length: summary.optimal_path_length,
            route_efficiency: summary.route_efficiency,
            elapsed_us: summary.telemetry.elapsed.as_micros(),
        }
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{:.3},{},{},{},{},{},{},{:.3},{},{:.6},{}",
            self.simulation_id,
            self.algorithm.key(),
            self.density,
            self.seed,
            self.walls,
            self.success,
            self.steps,
            self.nodes_visited,
            self.path_length,
            self.path_cost,
            self.optimal_path_length.map_or_else(String::new, |len| len.to_string()),
            self.route_efficiency,
            self.elapsed_us
        )
    }
}

/// Sweeps wall densities, runs `num_simulations` seeded grids per density
/// and writes one CSV row per algorithm run.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    written: usize,
    start_time: Instant,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            written: 0,
            start_time: Instant::now(),
        }
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<(), SimulationError> {
        let algorithms = self
            .config
            .algorithms()
            .map_err(|_| SimulationError::UnknownAlgorithm(self.config.algorithm.clone()))?;
        let densities = self.densities();
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        self.initialize_csv_file()?;

        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Grid size: {}x{}", self.config.rows, self.config.cols);
            println!(
                "Density range: {:.2} to {:.2} (step {:.2})",
                self.config.min_density, self.config.max_density, self.config.density_step
            );
            println!("Simulations per density: {}", self.config.num_simulations);
            println!("Algorithms: {}", self.config.algorithm);
            println!("Base seed: {}", base_seed);
            println!("Output file: {}", self.config.output_file);
            println!();
        }
        info!(
            "batch run: {} densities x {} simulations x {} algorithms",
            densities.len(),
            self.config.num_simulations,
            algorithms.len()
        );

        let mut simulation_id = 0;
        for (index, density) in densities.iter().copied().enumerate() {
            if !self.config.quiet {
                println!(
                    "Configuration {}/{}: density {:.2}",
                    index + 1,
                    densities.len(),
                    density
                );
            }

            for sim in 0..self.config.num_simulations {
                let seed = base_seed.wrapping_add(sim as u64);
                self.run_configuration(simulation_id, density, seed, &algorithms)?;
                simulation_id += 1;
            }
            self.flush_results_to_csv()?;
        }

        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Total results collected: {}", self.results.len());
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        } else {
            println!(
                "Batch simulation completed: {} results in {:.1}s -> {}",
                self.results.len(),
                self.start_time.elapsed().as_secs_f64(),
                self.config.output_file
            );
        }
        Ok(())
    }

    /// `min_density`, `min_density + step`, ... up to `max_density`.
    pub fn densities(&self) -> Vec<f64> {
        let step = self.config.density_step;
        let span = self.config.max_density - self.config.min_density;
        // Small slack so 0.0..=0.4 by 0.1 yields five values despite rounding.
        let count = (span / step + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|i| self.config.min_density + i as f64 * step)
            .collect()
    }

    /// Runs every algorithm on the same seeded grid.
    fn run_configuration(
        &mut self,
        simulation_id: usize,
        density: f64,
        seed: u64,
        algorithms: &[Algorithm],
    ) -> Result<(), SimulationError> {
        let grid = self.config.build_grid(density, Some(seed))?;
        let walls = grid.blocked_count();
        let mut params = self.config.solver_params();
        params.seed = Some(seed);

        for &algorithm in algorithms {
            let mut simulation = Simulation::new(grid.clone(), algorithm, params)
                .with_history_capacity(self.config.history_capacity);
            let summary = simulation.run_to_completion();
            debug!(
                "sim {} {} density {:.2}: success={} steps={}",
                simulation_id,
                algorithm,
                density,
                summary.success,
                summary.telemetry.steps
            );
            self.results.push(BatchResult::from_summary(
                simulation_id,
                density,
                seed,
                walls,
                &summary,
            ));
        }
        Ok(())
    }

    fn initialize_csv_file(&mut self) -> Result<(), SimulationError> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        self.written = 0;
        if !self.config.quiet {
            println!("Initialized CSV file: {}", self.config.output_file);
        }
        Ok(())
    }

    /// Appends every result not yet written.
    fn flush_results_to_csv(&mut self) -> Result<(), SimulationError> {
        let pending = &self.results[self.written..];
        if pending.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&self.config.output_file)?;
        let mut writer = BufWriter::new(file);
        for result in pending {
            writeln!(writer, "{}", result.csv_row())?;
        }
        writer.flush()?;

        self.written = self.results.len();
        debug!("flushed results to {} (total: {})", self.config.output_file, self.written);
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");

        let mut groups: BTreeMap<usize, Vec<&BatchResult>> = BTreeMap::new();
        for result in &self.results {
            groups.entry(result.algorithm.index()).or_default().push(result);
        }

        for results in groups.values() {
            let algorithm = results[0].algorithm;
            let total = results.len();
            let successful: Vec<&&BatchResult> = results.iter().filter(|r| r.success).collect();
            let success_rate = successful.len() as f64 / total as f64 * 100.0;

            println!("\n{} results:", algorithm.key());
            println!(
                "  Success rate: {}/{} ({:.1}%)",
                successful.len(),
                total,
                success_rate
            );

            if !successful.is_empty() {
                let n = successful.len() as f64;
                let avg_steps = successful.iter().map(|r| r.steps as f64).sum::<f64>() / n;
                let avg_path = successful.iter().map(|r| r.path_length as f64).sum::<f64>() / n;
                let avg_efficiency = successful.iter().map(|r| r.route_efficiency).sum::<f64>() / n;
                let avg_time = successful.iter().map(|r| r.elapsed_us as f64).sum::<f64>() / n;

                println!("  Average steps: {:.1}", avg_steps);
                println!("  Average path length: {:.1}", avg_path);
                println!("  Average efficiency: {:.3}", avg_efficiency);
                println!("  Average execution time: {:.1}us", avg_time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(extra: &[&str]) -> Config {
        let mut argv = vec![
            "stepwise_search",
            "--rows",
            "8",
            "--cols",
            "8",
            "--quiet",
        ];
        argv.extend_from_slice(extra);
        Config::parse_from(argv)
    }

    #[test]
    fn density_sweep_includes_both_ends() {
        let batch = BatchSimulation::new(config(&[]));
        let densities = batch.densities();
        assert_eq!(densities.len(), 5);
        assert!((densities[4] - 0.4).abs() < 1e-9);

        let single = BatchSimulation::new(config(&["--min-density", "0.2", "--max-density", "0.2"]));
        assert_eq!(single.densities(), vec![0.2]);
    }

    #[test]
    fn writes_one_row_per_run() {
        let path = std::env::temp_dir().join(format!("stepwise_batch_{}.csv", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let mut batch = BatchSimulation::new(config(&[
            "--algorithm",
            "all",
            "--num-simulations",
            "2",
            "--max-density",
            "0.1",
            "--seed",
            "11",
            "--output-file",
            &path_str,
        ]));

        batch.run().unwrap();

        // 2 densities x 2 seeds x 9 algorithms
        assert_eq!(batch.results().len(), 36);
        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 37);
        assert!(lines[1].starts_with("0,bfs,0.000,11,0,true"));
        std::fs::remove_file(&path).ok();
    }
}

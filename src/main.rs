use clap::Parser;

use stepwise_search::batch_simulation::BatchSimulation;
use stepwise_search::config::Config;
use stepwise_search::simulation::Simulation;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(2);
    }

    if !config.quiet {
        println!("Starting stepwise search...");
        println!("Grid size: {}x{}", config.rows, config.cols);
        println!("Wall density: {:.2}", config.density);
        println!("Algorithm: {}", config.algorithm);
        if config.no_visualization || config.batch_mode {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    if config.batch_mode {
        let mut batch_sim = BatchSimulation::new(config.clone());
        match batch_sim.run() {
            Ok(()) => {
                if !config.quiet {
                    batch_sim.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
    } else if config.runs_all_algorithms() {
        let grid = match config.build_grid(config.density, config.seed) {
            Ok(grid) => grid,
            Err(e) => {
                eprintln!("Failed to build grid: {}", e);
                std::process::exit(1);
            }
        };
        if !config.quiet {
            grid.print_grid(None);
        }
        let results = Simulation::run_all_algorithms(&grid, &config.solver_params());
        Simulation::print_comparison_results(&results);
    } else {
        let mut simulation = match Simulation::from_config(&config) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to create simulation: {}", e);
                std::process::exit(1);
            }
        };

        let summary = if config.no_visualization {
            simulation.run_to_completion()
        } else {
            simulation.run_visualized(Duration::from_millis(config.delay_ms))
        };

        println!("\n=== FINAL RESULTS ===");
        print!("{}", summary);

        if !config.quiet {
            simulation.grid().print_grid(simulation.current_snapshot());
        }

        if config.rewind > 0 {
            println!("\n=== REWIND ===");
            for i in 1..=config.rewind {
                match simulation.rewind() {
                    Some(snapshot) => println!(
                        "-{}: frontier {}, visited {}, terminal: {}",
                        i,
                        snapshot.frontier.len(),
                        snapshot.visited.len(),
                        snapshot.is_terminal()
                    ),
                    None => {
                        println!("Reached the oldest recorded step.");
                        break;
                    }
                }
            }
            if !config.quiet {
                simulation.grid().print_grid(simulation.current_snapshot());
            }
        }

        if !summary.success && summary.optimal_path_length.is_none() {
            println!("The target is unreachable; try a lower --density");
        }
    }
}


#[allow(unused_imports)]
mod utils;
mod logger;
mod catalog;
mod participant;
mod participants;
mod strategy;
mod strategies;
mod engine;
mod stats;
mod batch;
mod report;
mod charts;
mod scenarios;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use batch::{run_batch, BatchParam};
use catalog::standard_catalog;
use engine::{Engine, EngineConfig, EnginePhase};
use logger::{ConsoleReceiver, FileReceiver, LogEvent, Logger, sanitize_filename};
use participants::Roster;
use scenarios::get_scenario_catalog;
use stats::SimulationStat;
use utils::{RAND_SEED, TOTAL_SIMULATION_RUNS};

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();

    // Parse and filter out --verbose and --fastbreak arguments
    let mut args = Vec::new();
    let mut skip_next = false;
    let mut fastbreak = false;
    for (i, arg) in raw_args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--verbose" {
            if i + 1 < raw_args.len() && raw_args[i + 1] == "auction" {
                utils::VERBOSE_AUCTION.store(true, Ordering::Relaxed);
                skip_next = true;
            }
            continue;
        }
        if arg == "--fastbreak" {
            fastbreak = true;
            continue;
        }
        args.push(arg.clone());
    }

    // Check if "charts" argument is provided
    if args.len() > 1 && args[1] == "charts" {
        let mut logger = Logger::new();
        logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Batch]));
        match charts::generate_all_charts(&mut logger) {
            Ok(()) => {
                println!("All chart generation completed successfully.");
            }
            Err(e) => {
                eprintln!("Error generating charts: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Check if "report" argument is provided
    if args.len() > 1 && args[1] == "report" {
        // Optional second parameter: number of comparison runs
        let runs = if args.len() > 2 {
            match args[2].parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Error: Invalid runs parameter '{}'. Expected a number.", args[2]);
                    std::process::exit(1);
                }
            }
        } else {
            100
        };

        let mut logger = Logger::new();
        logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Batch]));
        let stat = match run_batch(&BatchParam::standard(runs), &mut logger) {
            Ok(stat) => stat,
            Err(e) => {
                eprintln!("Error running comparison batch: {}", e);
                std::process::exit(1);
            }
        };
        let path = PathBuf::from("report/analysis-report.txt");
        match report::write_report(&stat, &path) {
            Ok(()) => {
                println!("Analysis report written to {}", path.display());
            }
            Err(e) => {
                eprintln!("Error writing report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if args.len() > 1 {
        let scenario_arg = &args[1];

        // Parse iterations parameter if present
        let iterations = if args.len() > 2 {
            match args[2].parse::<u64>() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Error: Invalid iterations parameter '{}'. Expected a number.", args[2]);
                    std::process::exit(1);
                }
            }
        } else {
            1
        };

        // Parse optional starting iteration index if present
        let start_iteration = if args.len() > 3 {
            match args[3].parse::<u64>() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Error: Invalid start iteration parameter '{}'. Expected a number.", args[3]);
                    std::process::exit(1);
                }
            }
        } else {
            0
        };

        // Get all scenarios from the catalog
        let all_scenarios = get_scenario_catalog();

        // Filter scenarios: if "all", use all scenarios; otherwise filter to the named scenario
        let scenarios: Vec<_> = if scenario_arg == "all" {
            all_scenarios.clone()
        } else {
            // Find the requested scenario
            let found = all_scenarios.iter().find(|s| s.short_name == scenario_arg);
            match found {
                Some(scenario) => vec![scenario.clone()],
                None => {
                    eprintln!("Error: Scenario '{}' not found.", scenario_arg);
                    eprintln!("Available scenarios:");
                    for s in &all_scenarios {
                        eprintln!("  - {}", s.short_name);
                    }
                    std::process::exit(1);
                }
            }
        };

        // Set up logger with console and validation file receivers
        // When running a specific scenario (not "all") with a single iteration,
        // also enable Scenario logging to show individual validations
        // When running multiple iterations, suppress Scenario logging to avoid cluttering output
        let mut logger = Logger::new();
        if scenario_arg == "all" {
            logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation]));
        } else {
            // Only show Scenario events on console for single iteration runs
            if iterations == 1 {
                logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation, LogEvent::Scenario]));
            } else {
                logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation]));
            }
        }

        // Add validation receiver (for validation events)
        let summary_receiver_id = logger.add_receiver(FileReceiver::new(&PathBuf::from("log/summary.log"), vec![LogEvent::Validation]));

        // Reset and log initial simulation run count
        TOTAL_SIMULATION_RUNS.store(0, Ordering::Relaxed);
        let initial_count = TOTAL_SIMULATION_RUNS.load(Ordering::Relaxed);

        // Log appropriate message
        if scenario_arg == "all" {
            if iterations > 1 {
                logln!(&mut logger, LogEvent::Validation, "Running all scenarios {} times... (Total simulation runs: {})\n", iterations, initial_count);
            } else {
                logln!(&mut logger, LogEvent::Validation, "Running all scenarios... (Total simulation runs: {})\n", initial_count);
            }
        } else {
            if iterations > 1 {
                logln!(&mut logger, LogEvent::Validation, "Running scenario '{}' {} times... (Total simulation runs: {})\n", scenario_arg, iterations, initial_count);
            } else {
                logln!(&mut logger, LogEvent::Validation, "Running scenario '{}'... (Total simulation runs: {})\n", scenario_arg, initial_count);
            }
        }

        // Outer loop for scenarios
        'scenarios: for scenario in &scenarios {
            log!(&mut logger, LogEvent::Validation, "{}: ", scenario.short_name);

            // Add scenario-level receiver
            let scenario_receiver_id = logger.add_receiver(FileReceiver::new(&PathBuf::from(format!("log/{}/scenario.log", sanitize_filename(scenario.short_name))), vec![LogEvent::Scenario]));

            // Inner loop for iterations
            for i in start_iteration..(start_iteration + iterations) {
                if iterations > 1 {
                    let iteration_num = i - start_iteration + 1;
                    log!(&mut logger, LogEvent::Validation, "[{}/{}] ", iteration_num, iterations);
                }

                // Set RAND_SEED to iteration number
                RAND_SEED.store(i, Ordering::Relaxed);

                match (scenario.run)(scenario.short_name, &mut logger) {
                    Ok(()) => {
                        if iterations > 1 {
                            logln!(&mut logger, LogEvent::Validation, "✓");
                        } else {
                            logln!(&mut logger, LogEvent::Validation, "✓ PASSED");
                        }
                    },
                    Err(e) => {
                        if iterations > 1 {
                            logln!(&mut logger, LogEvent::Validation, "✗");
                        } else {
                            logln!(&mut logger, LogEvent::Validation, "✗ FAILED: {}", e);
                        }

                        // If fastbreak is enabled, stop immediately on first failure
                        if fastbreak {
                            // Remove scenario-level receiver before breaking
                            logger.remove_receiver(scenario_receiver_id);
                            logln!(&mut logger, LogEvent::Validation, "\nStopping scenario execution due to failure (--fastbreak enabled)");
                            // Always log the full error message when fastbreak stops execution
                            if iterations > 1 {
                                let iteration_num = i - start_iteration + 1;
                                logln!(&mut logger, LogEvent::Validation, "Error at iteration {}/{} (seed {}): {}", iteration_num, iterations, i, e);
                            } else {
                                logln!(&mut logger, LogEvent::Validation, "Error: {}", e);
                            }
                            break 'scenarios;
                        }
                    }
                }

                // Flush to ensure validation is written to summary.log
                let _ = logger.flush();
            }

            // Remove scenario-level receiver
            logger.remove_receiver(scenario_receiver_id);
        }

        // Log final simulation run count
        let final_count = TOTAL_SIMULATION_RUNS.load(Ordering::Relaxed);
        logln!(&mut logger, LogEvent::Validation, "\nTotal simulation runs completed: {}", final_count);

        // Remove validation receiver
        logger.remove_receiver(summary_receiver_id);
    } else {
        // Default behavior: live showcase over the standard catalog with one
        // bidder per strategy, streaming the per-tick state to the console
        let mut logger = Logger::new();
        logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Auction, LogEvent::Round, LogEvent::Simulation]));
        if let Err(e) = run_showcase(&mut logger) {
            eprintln!("Error running showcase: {}", e);
            std::process::exit(1);
        }
    }

}

/// Tick the standard catalog showcase to completion, logging a price line per
/// tick from the engine's state snapshots
fn run_showcase(logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::new(standard_catalog(), Roster::one_per_strategy(2000.0));
    let mut engine = Engine::new(config);
    engine.start(logger)?;

    loop {
        engine.tick(logger);
        let snapshot = engine.snapshot();
        if snapshot.phase != EnginePhase::Running {
            break;
        }
        if let (Some(round_number), Some(clock_remaining)) =
            (snapshot.round_number, snapshot.clock_remaining)
        {
            let item = &snapshot.items[round_number - 1];
            let leader = snapshot
                .participants
                .iter()
                .filter(|p| p.current_bid > 0.0)
                .max_by(|a, b| a.current_bid.total_cmp(&b.current_bid));
            match leader {
                Some(leader) => {
                    logln!(
                        logger,
                        LogEvent::Auction,
                        "[round {} t-{:02}] {} at {:.0}, {} leading",
                        round_number,
                        clock_remaining,
                        item.name,
                        item.current_price,
                        leader.name
                    );
                }
                None => {
                    logln!(
                        logger,
                        LogEvent::Auction,
                        "[round {} t-{:02}] {} at {:.0}, no bids yet",
                        round_number,
                        clock_remaining,
                        item.name,
                        item.current_price
                    );
                }
            }
        }
    }

    let stats = SimulationStat::new(engine.items(), engine.participants());
    stats.printout(engine.items(), engine.participants(), logger);
    Ok(())
}

use std::error::Error;
use std::path::PathBuf;

use crate::engine::{ConfigError, Engine};
use crate::logger::{sanitize_filename, FileReceiver, LogEvent, Logger};
use crate::logln;
use crate::stats::SimulationStat;

/// Function type for scenario entry functions
pub type ScenarioFn = fn(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn Error>>;

/// Entry in the scenario catalog
#[derive(Clone)]
pub struct ScenarioEntry {
    pub short_name: &'static str,
    pub run: ScenarioFn,
}

// Create an inventory collection for scenario entries
inventory::collect!(ScenarioEntry);

/// Get all registered scenarios from the catalog
pub fn get_scenario_catalog() -> Vec<ScenarioEntry> {
    inventory::iter::<ScenarioEntry>
        .into_iter()
        .map(|entry| entry.clone())
        .collect()
}

// Users can register scenarios directly using inventory::submit!
// Example:
// inventory::submit!(scenarios::ScenarioEntry {
//     short_name: "name",
//     run: function,
// });

/// Run one engine variant to completion with logging setup and cleanup
///
/// # Arguments
/// * `engine` - A configured engine, not yet started
/// * `variant_description` - Description of the variant being run
/// * `scenario_name` - Name of the scenario (for log file paths)
/// * `variant_name` - Name of the variant (for log file paths)
/// * `logger` - Logger for event-based logging
///
/// # Returns
/// The finished engine together with its derived statistics
pub fn run_variant(
    mut engine: Engine,
    variant_description: &str,
    scenario_name: &str,
    variant_name: &str,
    logger: &mut Logger,
) -> Result<(Engine, SimulationStat), ConfigError> {
    // Add rounds receiver (per-round and per-bid events)
    let rounds_receiver_id = logger.add_receiver(FileReceiver::new(
        &PathBuf::from(format!(
            "log/{}/rounds-{}.log",
            sanitize_filename(scenario_name),
            sanitize_filename(variant_name)
        )),
        vec![LogEvent::Auction, LogEvent::Round],
    ));

    // Add run receiver (run-level events)
    let run_receiver_id = logger.add_receiver(FileReceiver::new(
        &PathBuf::from(format!(
            "log/{}/run-{}.log",
            sanitize_filename(scenario_name),
            sanitize_filename(variant_name)
        )),
        vec![LogEvent::Simulation],
    ));

    logln!(logger, LogEvent::Simulation, "\n=== {} ===", variant_description);

    let result = engine.start(logger);
    if let Err(error) = result {
        logger.remove_receiver(run_receiver_id);
        logger.remove_receiver(rounds_receiver_id);
        return Err(error);
    }
    let ticks = engine.run_to_finish(logger);
    logln!(logger, LogEvent::Simulation, "Completed in {} ticks", ticks);

    let stats = SimulationStat::new(engine.items(), engine.participants());
    stats.printout(engine.items(), engine.participants(), logger);

    // Remove variant-specific receivers
    logger.remove_receiver(run_receiver_id);
    logger.remove_receiver(rounds_receiver_id);

    Ok((engine, stats))
}

// Scenario modules
pub mod single_item_duel;
pub mod greedy_vs_dynamic;
pub mod vickrey_vs_sealed;
pub mod budget_limited;
pub mod minimax_battle;
pub mod reserve_exhaustion;
pub mod no_bids;

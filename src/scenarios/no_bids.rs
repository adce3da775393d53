/// A 100-value lot opening at 95 leaves every strategy's entry threshold
/// unmet: no headroom for the chaser, a paced target below the opening, a
/// value density nowhere near the bar, and counter raises that cannot clear
/// the price. The lot must pass unsold with nobody spending a unit.

use crate::catalog::{Category, ItemTemplate};
use crate::engine::{Engine, EngineConfig};
use crate::logger::{LogEvent, Logger};
use crate::participants::Roster;
use crate::scenarios::run_variant;
use crate::logln;
use crate::errln;

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "no_bids",
    run,
});

fn prepare_engine() -> Engine {
    let catalog = vec![ItemTemplate::new(
        "Overpriced Vase",
        Category::Collectibles,
        100.0,
        95.0,
    )];
    Engine::new(EngineConfig::new(catalog, Roster::one_per_strategy(1000.0)))
}

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let engine = prepare_engine();
    let (engine, _stats) = run_variant(
        engine,
        "A lot nobody wants at the asking price",
        scenario_name,
        "unsold",
        logger,
    )?;

    logln!(logger, LogEvent::Scenario, "");

    let mut errors: Vec<String> = Vec::new();
    let item = &engine.items()[0];

    let msg = format!(
        "Lot passes unsold at its opening price ({:.0})",
        item.current_price
    );
    if !item.sold && item.winner_id.is_none() && item.current_price == 95.0 {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    for participant in engine.participants() {
        let msg = format!("'{}' spent nothing", participant.name);
        if participant.total_spent == 0.0
            && participant.current_bid == 0.0
            && participant.remaining_budget == participant.initial_budget
        {
            logln!(logger, LogEvent::Scenario, "✓ {}", msg);
        } else {
            errors.push(msg.clone());
            errln!(logger, LogEvent::Scenario, "✗ {}", msg);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Scenario '{}' validation failed:\n{}",
            scenario_name,
            errors.join("\n")
        )
        .into())
    }
}

/// Low budgets against high-value lots: a greedy chaser and a density
/// bidder, each with 400 against a 1000-value flagship and a 500-value
/// follow-up.
///
/// The density bidder empties its whole budget into the flagship and drops
/// under the reserve, leaving the follow-up lot to the chaser. Prioritization
/// under scarcity is exactly what this exercises.

use crate::catalog::{Category, ItemTemplate};
use crate::engine::{Engine, EngineConfig};
use crate::logger::{LogEvent, Logger};
use crate::participants::{Roster, StrategyKind};
use crate::scenarios::run_variant;
use crate::logln;
use crate::errln;

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "budget_limited",
    run,
});

fn prepare_engine() -> Engine {
    let catalog = vec![
        ItemTemplate::new("High-Value Item", Category::Collectibles, 1000.0, 300.0),
        ItemTemplate::new("Medium-Value Item", Category::Electronics, 500.0, 150.0),
    ];
    let mut roster = Roster::new();
    roster.add("Greedy Agent", StrategyKind::GREEDY, 400.0);
    roster.add("Density Agent", StrategyKind::KNAPSACK, 400.0);
    Engine::new(EngineConfig::new(catalog, roster))
}

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let engine = prepare_engine();
    let (engine, _stats) = run_variant(
        engine,
        "Tight budgets on high-value lots",
        scenario_name,
        "scarce",
        logger,
    )?;

    logln!(logger, LogEvent::Scenario, "");

    let mut errors: Vec<String> = Vec::new();

    for participant in engine.participants() {
        let msg = format!(
            "'{}' never overspends: {:.0} of {:.0}",
            participant.name, participant.total_spent, participant.initial_budget
        );
        if participant.total_spent <= participant.initial_budget
            && participant.remaining_budget >= 0.0
        {
            logln!(logger, LogEvent::Scenario, "✓ {}", msg);
        } else {
            errors.push(msg.clone());
            errln!(logger, LogEvent::Scenario, "✗ {}", msg);
        }
    }

    // The density jump is min(800, budget) = the full 400, which clears any
    // price the chaser can reach first; spending it all trips the reserve
    let density = &engine.participants()[1];
    let flagship = &engine.items()[0];
    let msg = format!(
        "Density agent takes the flagship and retires (active: {})",
        density.active
    );
    if flagship.winner_id == Some(1) && !density.active && density.remaining_budget < 50.0 {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    // With the density bidder retired, the follow-up lot belongs to the
    // chaser if it sells at all
    let follow_up = &engine.items()[1];
    let msg = format!(
        "Follow-up lot contested only by the chaser (winner: {:?})",
        follow_up.winner_id
    );
    if !follow_up.sold || follow_up.winner_id == Some(0) {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
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

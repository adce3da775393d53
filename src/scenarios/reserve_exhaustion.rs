/// A shoestring bidder with 60 against two cheap prints.
///
/// One small winning bid on the first print drops the remaining budget under
/// the 50-unit reserve; from that point the bidder is retired for good and
/// the second print must pass unsold.

use crate::catalog::{Category, ItemTemplate};
use crate::engine::{Engine, EngineConfig};
use crate::logger::{LogEvent, Logger};
use crate::participants::{Roster, StrategyKind};
use crate::scenarios::run_variant;
use crate::logln;
use crate::errln;

// Register this scenario in the catalog
inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "reserve_exhaustion",
    run,
});

fn prepare_engine() -> Engine {
    let catalog = vec![
        ItemTemplate::new("Small Print", Category::Art, 300.0, 30.0),
        ItemTemplate::new("Large Print", Category::Art, 300.0, 50.0),
    ];
    let mut roster = Roster::new();
    roster.add("Shoestring Agent", StrategyKind::GREEDY, 60.0);
    Engine::new(EngineConfig::new(catalog, roster))
}

pub fn run(scenario_name: &str, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let engine = prepare_engine();
    let (engine, _stats) = run_variant(
        engine,
        "Shoestring budget against the reserve threshold",
        scenario_name,
        "shoestring",
        logger,
    )?;

    logln!(logger, LogEvent::Scenario, "");

    let mut errors: Vec<String> = Vec::new();
    let participant = &engine.participants()[0];

    let msg = format!(
        "First print won for {:.0}",
        engine.items()[0].final_price.unwrap_or(0.0)
    );
    if engine.items()[0].sold && participant.items_won.len() == 1 {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    let msg = format!(
        "Bidder retired below reserve (remaining {:.0})",
        participant.remaining_budget
    );
    if !participant.active
        && participant.remaining_budget < 50.0
        && participant.remaining_budget >= 0.0
    {
        logln!(logger, LogEvent::Scenario, "✓ {}", msg);
    } else {
        errors.push(msg.clone());
        errln!(logger, LogEvent::Scenario, "✗ {}", msg);
    }

    let msg = "Second print passes unsold with no further bids".to_string();
    if !engine.items()[1].sold
        && engine.items()[1].winner_id.is_none()
        && engine.items()[1].current_price == 50.0
    {
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

/// This file contains the round engine: the state machine that advances a
/// catalog of items through bounded bidding rounds, applies the strategies'
/// decisions tick by tick, and settles a winner (or none) when each round's
/// clock expires.
///
/// The engine owns the whole simulation state and is driven from outside by
/// `tick()`; it holds no wall clock of its own, which keeps every run
/// reproducible and directly testable.

use std::sync::atomic::Ordering;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::catalog::{Item, ItemTemplate};
use crate::logger::{LogEvent, Logger};
use crate::{logln, warnln};
use crate::participant::Participant;
use crate::participants::Roster;
use crate::strategies::{make_strategy, StrategyTuning};
use crate::strategy::{BidderStrategy, DecisionContext};
use crate::utils::{get_seed, TOTAL_SIMULATION_RUNS, VERBOSE_AUCTION};

/// Randomness stream for bid increments (see utils::get_seed)
const RNG_STREAM_BIDDING: u64 = 5995;

/// Decision mode within a tick
///
/// TURN_BASED evaluates one participant per tick (rotating through the
/// roster) and applies its bid immediately, so later turns see the raised
/// price. CONTINUOUS evaluates every active participant against the
/// start-of-tick snapshot, then applies the proposals together.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BiddingMode {
    TURN_BASED,
    CONTINUOUS,
}

/// What the winner pays at settlement
///
/// FIRST_PRICE charges the winning bid (open ascending and sealed formats).
/// SECOND_PRICE charges the best losing bid, floored at the starting price
/// (Vickrey format).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingRule {
    FIRST_PRICE,
    SECOND_PRICE,
}

/// Engine lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Configuration-validation failures, the only user-visible error surface
/// Everything else the engine absorbs as a normal outcome
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("participant roster is empty")]
    EmptyRoster,
    #[error("participant '{name}' has a non-positive budget")]
    NonPositiveBudget { name: String },
    #[error("round clock must be at least one tick")]
    NonPositiveClock,
    #[error("item '{name}' has a non-positive starting price")]
    NonPositiveStartingPrice { name: String },
    #[error("item '{name}' has an estimated value below its starting price")]
    ValueBelowStartingPrice { name: String },
    #[error("reserve threshold must not be negative")]
    NegativeReserve,
}

/// Full engine configuration, supplied before `start()`
pub struct EngineConfig {
    pub catalog: Vec<ItemTemplate>,
    pub roster: Roster,
    /// Round duration in ticks
    pub clock_total: u32,
    pub mode: BiddingMode,
    pub pricing: PricingRule,
    /// A participant whose remaining budget drops below this retires for the
    /// rest of the simulation
    pub reserve_threshold: f64,
    /// Threshold constants shared by every participant on a strategy kind
    pub tuning: StrategyTuning,
}

impl EngineConfig {
    /// Configuration with the default clock, mode, pricing, reserve and
    /// strategy tuning
    pub fn new(catalog: Vec<ItemTemplate>, roster: Roster) -> Self {
        Self {
            catalog,
            roster,
            clock_total: 15,
            mode: BiddingMode::TURN_BASED,
            pricing: PricingRule::FIRST_PRICE,
            reserve_threshold: 50.0,
            tuning: StrategyTuning::default(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.roster.entries.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if self.clock_total == 0 {
            return Err(ConfigError::NonPositiveClock);
        }
        if self.reserve_threshold < 0.0 {
            return Err(ConfigError::NegativeReserve);
        }
        for entry in &self.roster.entries {
            if entry.initial_budget <= 0.0 {
                return Err(ConfigError::NonPositiveBudget {
                    name: entry.name.clone(),
                });
            }
        }
        for template in &self.catalog {
            if template.starting_price <= 0.0 {
                return Err(ConfigError::NonPositiveStartingPrice {
                    name: template.name.clone(),
                });
            }
            if template.estimated_value < template.starting_price {
                return Err(ConfigError::ValueBelowStartingPrice {
                    name: template.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Transient per-round state, folded into items/participants at settlement
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub item_index: usize,
    pub clock_remaining: u32,
    pub turn_index: usize,
}

/// Read-only copy of the simulation state handed to external consumers
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    pub phase: EnginePhase,
    /// 1-based round number while a round is armed
    pub round_number: Option<usize>,
    pub clock_remaining: Option<u32>,
    pub items: Vec<Item>,
    pub participants: Vec<Participant>,
}

/// The round engine. Sole owner and mutator of the simulation state;
/// external collaborators read snapshots between ticks and drive the engine
/// through start/pause/resume/reset/tick
pub struct Engine {
    config: EngineConfig,
    items: Vec<Item>,
    participants: Vec<Participant>,
    strategies: Vec<Box<dyn BidderStrategy>>,
    round: Option<Round>,
    phase: EnginePhase,
    rng: StdRng,
}

impl Engine {
    /// Create an engine in the Idle phase
    /// The configuration is validated on `start()`, not here
    pub fn new(config: EngineConfig) -> Self {
        let items = Self::build_items(&config.catalog);
        let participants = Self::build_participants(&config.roster);
        let strategies = config
            .roster
            .entries
            .iter()
            .map(|entry| make_strategy(&config.tuning, entry.strategy))
            .collect();
        Self {
            config,
            items,
            participants,
            strategies,
            round: None,
            phase: EnginePhase::Idle,
            rng: StdRng::seed_from_u64(get_seed(RNG_STREAM_BIDDING)),
        }
    }

    fn build_items(catalog: &[ItemTemplate]) -> Vec<Item> {
        catalog
            .iter()
            .enumerate()
            .map(|(index, template)| Item::from_template(index, template))
            .collect()
    }

    fn build_participants(roster: &Roster) -> Vec<Participant> {
        roster
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Participant::new(index, &entry.name, entry.strategy, entry.initial_budget)
            })
            .collect()
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// The item currently under the hammer, if a round is armed
    pub fn current_item(&self) -> Option<&Item> {
        self.round.as_ref().map(|round| &self.items[round.item_index])
    }

    /// Clone the state for external consumers (live display, reporting)
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            phase: self.phase,
            round_number: self.round.as_ref().map(|round| round.item_index + 1),
            clock_remaining: self.round.as_ref().map(|round| round.clock_remaining),
            items: self.items.clone(),
            participants: self.participants.clone(),
        }
    }

    /// Validate the configuration and begin (or restart) the simulation
    /// Calling start while Running discards the run in progress and starts
    /// over from the initial configuration
    pub fn start(&mut self, logger: &mut Logger) -> Result<(), ConfigError> {
        self.config.validate()?;
        self.restore_initial_state();
        self.phase = EnginePhase::Running;
        self.arm_round(0, logger);
        logln!(
            logger,
            LogEvent::Simulation,
            "Simulation started: {} items, {} participants, {} ticks per round",
            self.items.len(),
            self.participants.len(),
            self.config.clock_total
        );
        Ok(())
    }

    /// Force the engine back to Idle with items and participants restored to
    /// their initial configuration. Callable from any phase; calling it twice
    /// in a row leaves the same state as calling it once
    pub fn reset(&mut self) {
        self.restore_initial_state();
    }

    fn restore_initial_state(&mut self) {
        self.items = Self::build_items(&self.config.catalog);
        for participant in &mut self.participants {
            participant.reset();
        }
        self.round = None;
        self.phase = EnginePhase::Idle;
        self.rng = StdRng::seed_from_u64(get_seed(RNG_STREAM_BIDDING));
    }

    /// Stop the clock without losing round progress; no-op unless Running
    pub fn pause(&mut self) {
        if self.phase == EnginePhase::Running {
            self.phase = EnginePhase::Paused;
        }
    }

    /// Resume a paused simulation; no-op unless Paused
    pub fn resume(&mut self) {
        if self.phase == EnginePhase::Paused {
            self.phase = EnginePhase::Running;
        }
    }

    /// Arm a round for the next unsold item at or after `from_index`
    /// Transitions to Finished when the catalog is exhausted
    fn arm_round(&mut self, from_index: usize, logger: &mut Logger) {
        let next_index = (from_index..self.items.len()).find(|&index| !self.items[index].sold);
        match next_index {
            Some(item_index) => {
                self.round = Some(Round {
                    item_index,
                    clock_remaining: self.config.clock_total,
                    turn_index: 0,
                });
                logln!(
                    logger,
                    LogEvent::Round,
                    "Round {} starting: {} [{}] (value {:.0}, opening at {:.0})",
                    item_index + 1,
                    self.items[item_index].name,
                    self.items[item_index].category.name(),
                    self.items[item_index].estimated_value,
                    self.items[item_index].starting_price
                );
            }
            None => {
                self.round = None;
                self.phase = EnginePhase::Finished;
                TOTAL_SIMULATION_RUNS.fetch_add(1, Ordering::Relaxed);
                let sold = self.items.iter().filter(|item| item.sold).count();
                logln!(
                    logger,
                    LogEvent::Simulation,
                    "Auction finished: {}/{} items sold",
                    sold,
                    self.items.len()
                );
            }
        }
    }

    /// Advance the simulation by one clock tick
    /// Decrements the round clock, evaluates bid decisions per the configured
    /// mode, and settles the round once the clock reaches zero. Does nothing
    /// unless the engine is Running
    pub fn tick(&mut self, logger: &mut Logger) {
        if self.phase != EnginePhase::Running {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.clock_remaining = round.clock_remaining.saturating_sub(1);

        match self.config.mode {
            BiddingMode::TURN_BASED => self.tick_turn_based(logger),
            BiddingMode::CONTINUOUS => self.tick_continuous(logger),
        }

        let expired = self
            .round
            .as_ref()
            .map(|round| round.clock_remaining == 0)
            .unwrap_or(false);
        if expired {
            self.settle_round(logger);
        }
    }

    /// One participant decides per tick; an accepted bid is visible to the
    /// price immediately, so the next turn reacts to it
    fn tick_turn_based(&mut self, logger: &mut Logger) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let item_index = round.item_index;
        let turn = round.turn_index % self.participants.len();

        if self.participants[turn].active && !self.items[item_index].sold {
            let competitor_bids = self.competitor_bids(turn);
            let ctx = DecisionContext {
                item: &self.items[item_index],
                remaining_budget: self.participants[turn].remaining_budget,
                initial_budget: self.participants[turn].initial_budget,
                competitor_bids: &competitor_bids,
                future_value: self.future_value(item_index),
                clock_remaining: round.clock_remaining,
                clock_total: self.config.clock_total,
            };
            let decision = self.strategies[turn].decide(&ctx, &mut self.rng);
            if let Some(amount) = decision {
                let floor_price = self.items[item_index].current_price;
                self.apply_bid(turn, item_index, amount, floor_price, logger);
            }
        }

        if let Some(round) = self.round.as_mut() {
            round.turn_index = (turn + 1) % self.participants.len();
        }
    }

    /// Every active participant decides against the start-of-tick snapshot;
    /// proposals are applied together afterwards, so decisions within the
    /// tick do not see each other
    fn tick_continuous(&mut self, logger: &mut Logger) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let item_index = round.item_index;
        if self.items[item_index].sold {
            return;
        }
        let snapshot_price = self.items[item_index].current_price;
        let bids_snapshot: Vec<(bool, f64)> = self
            .participants
            .iter()
            .map(|p| (p.active, p.current_bid))
            .collect();
        let clock_remaining = round.clock_remaining;

        let mut proposals = Vec::new();
        for index in 0..self.participants.len() {
            if !self.participants[index].active {
                continue;
            }
            let competitor_bids: Vec<f64> = bids_snapshot
                .iter()
                .enumerate()
                .filter(|(other, (active, _))| *other != index && *active)
                .map(|(_, (_, bid))| *bid)
                .collect();
            let ctx = DecisionContext {
                item: &self.items[item_index],
                remaining_budget: self.participants[index].remaining_budget,
                initial_budget: self.participants[index].initial_budget,
                competitor_bids: &competitor_bids,
                future_value: self.future_value(item_index),
                clock_remaining,
                clock_total: self.config.clock_total,
            };
            if let Some(amount) = self.strategies[index].decide(&ctx, &mut self.rng) {
                proposals.push((index, amount));
            }
        }

        for (index, amount) in proposals {
            self.apply_bid(index, item_index, amount, snapshot_price, logger);
        }
    }

    /// Sum of estimated values of unsold items still ahead in the catalog
    fn future_value(&self, item_index: usize) -> f64 {
        self.items
            .iter()
            .skip(item_index + 1)
            .filter(|item| !item.sold)
            .map(|item| item.estimated_value)
            .sum()
    }

    /// Standing bids of the other active participants (live values)
    fn competitor_bids(&self, participant_index: usize) -> Vec<f64> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(index, p)| *index != participant_index && p.active)
            .map(|(_, p)| p.current_bid)
            .collect()
    }

    /// Validation gate for a proposed bid. A bid that exceeds the remaining
    /// budget, fails to raise the price it was decided against, or does not
    /// improve the participant's own standing bid is discarded without error
    fn apply_bid(
        &mut self,
        participant_index: usize,
        item_index: usize,
        amount: f64,
        floor_price: f64,
        logger: &mut Logger,
    ) {
        let verbose = VERBOSE_AUCTION.load(Ordering::Relaxed);
        let participant = &mut self.participants[participant_index];
        if amount > participant.remaining_budget {
            if verbose {
                logln!(
                    logger,
                    LogEvent::Auction,
                    "{} bid {:.0} discarded: exceeds remaining budget {:.0}",
                    participant.name,
                    amount,
                    participant.remaining_budget
                );
            }
            return;
        }
        if amount <= floor_price || amount <= participant.current_bid {
            if verbose {
                logln!(
                    logger,
                    LogEvent::Auction,
                    "{} bid {:.0} discarded: does not raise {:.0}",
                    participant.name,
                    amount,
                    floor_price.max(participant.current_bid)
                );
            }
            return;
        }
        participant.current_bid = amount;
        let name = participant.name.clone();
        let item = &mut self.items[item_index];
        if amount > item.current_price {
            item.current_price = amount;
        }
        if verbose {
            logln!(
                logger,
                LogEvent::Auction,
                "{} raises {} to {:.0}",
                name,
                item.name,
                amount
            );
        }
    }

    /// Terminal computation of the round: pick the winner (if any), charge it
    /// per the pricing rule, update ownership and budgets, and advance to the
    /// next unsold item or to Finished
    fn settle_round(&mut self, logger: &mut Logger) {
        let Some(round) = self.round.take() else {
            return;
        };
        let item_index = round.item_index;

        // Strictly greatest positive bid wins; ties resolve to the earliest
        // roster position
        let mut winner_index: Option<usize> = None;
        let mut winning_bid = 0.0;
        for (index, participant) in self.participants.iter().enumerate() {
            if participant.active && participant.current_bid > winning_bid {
                winning_bid = participant.current_bid;
                winner_index = Some(index);
            }
        }

        match winner_index {
            Some(winner) => {
                let charge = match self.config.pricing {
                    PricingRule::FIRST_PRICE => winning_bid,
                    PricingRule::SECOND_PRICE => {
                        let runner_up = self
                            .participants
                            .iter()
                            .enumerate()
                            .filter(|(index, p)| *index != winner && p.current_bid > 0.0)
                            .map(|(_, p)| p.current_bid)
                            .fold(0.0, f64::max);
                        runner_up.max(self.items[item_index].starting_price)
                    }
                };

                let item = &mut self.items[item_index];
                item.sold = true;
                item.winner_id = Some(winner);
                item.final_price = Some(charge);
                let settled_item = item.clone();

                self.participants[winner].record_win(&settled_item, charge);
                logln!(
                    logger,
                    LogEvent::Round,
                    "Round {}: {} sold to {} for {:.0}",
                    item_index + 1,
                    settled_item.name,
                    self.participants[winner].name,
                    charge
                );
                if self.participants[winner].remaining_budget < self.config.reserve_threshold {
                    self.participants[winner].active = false;
                    logln!(
                        logger,
                        LogEvent::Round,
                        "{} retires: remaining budget {:.0} below reserve {:.0}",
                        self.participants[winner].name,
                        self.participants[winner].remaining_budget,
                        self.config.reserve_threshold
                    );
                }
            }
            None => {
                logln!(
                    logger,
                    LogEvent::Round,
                    "Round {}: no bids received for {}",
                    item_index + 1,
                    self.items[item_index].name
                );
            }
        }

        for participant in &mut self.participants {
            participant.current_bid = 0.0;
        }

        self.arm_round(item_index + 1, logger);
    }

    /// Tick the engine until it reaches Finished, with a hard bound so a
    /// stuck configuration cannot spin forever
    ///
    /// # Returns
    /// The number of ticks consumed
    pub fn run_to_finish(&mut self, logger: &mut Logger) -> usize {
        let bound = self.items.len() * self.config.clock_total as usize + self.items.len() + 1;
        let mut ticks = 0;
        while self.phase == EnginePhase::Running && ticks < bound {
            self.tick(logger);
            ticks += 1;
        }
        if self.phase == EnginePhase::Running {
            warnln!(
                logger,
                LogEvent::Simulation,
                "Tick bound {} exhausted before the simulation finished",
                bound
            );
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{standard_catalog, Category, ItemTemplate};
    use crate::participants::{Roster, StrategyKind};

    fn duel_config() -> EngineConfig {
        let catalog = vec![ItemTemplate::new(
            "Vintage Painting",
            Category::Art,
            300.0,
            50.0,
        )];
        let mut roster = Roster::new();
        roster.add("Greedy Agent", StrategyKind::GREEDY, 500.0);
        roster.add("Dynamic Agent", StrategyKind::DYNAMIC, 500.0);
        EngineConfig::new(catalog, roster)
    }

    #[test]
    fn test_start_rejects_empty_catalog() {
        let config = EngineConfig::new(Vec::new(), Roster::one_per_strategy(1000.0));
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        assert_eq!(engine.start(&mut logger), Err(ConfigError::EmptyCatalog));
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }

    #[test]
    fn test_start_rejects_non_positive_budget() {
        let mut roster = Roster::new();
        roster.add("Broke Agent", StrategyKind::GREEDY, 0.0);
        let config = EngineConfig::new(standard_catalog(), roster);
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        assert_eq!(
            engine.start(&mut logger),
            Err(ConfigError::NonPositiveBudget {
                name: "Broke Agent".to_string()
            })
        );
    }

    #[test]
    fn test_start_rejects_zero_clock() {
        let mut config = duel_config();
        config.clock_total = 0;
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        assert_eq!(engine.start(&mut logger), Err(ConfigError::NonPositiveClock));
    }

    #[test]
    fn test_run_terminates_within_bound() {
        let config = EngineConfig::new(standard_catalog(), Roster::one_per_strategy(2000.0));
        let bound = 5 * 15 + 5 + 1;
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        let ticks = engine.run_to_finish(&mut logger);
        assert_eq!(engine.phase(), EnginePhase::Finished);
        assert!(ticks <= bound);
    }

    #[test]
    fn test_budget_invariant_holds_after_run() {
        let config = EngineConfig::new(standard_catalog(), Roster::one_per_strategy(2000.0));
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);
        for participant in engine.participants() {
            assert_eq!(
                participant.remaining_budget,
                participant.initial_budget - participant.total_spent
            );
            assert!(participant.remaining_budget >= 0.0);
        }
    }

    #[test]
    fn test_settlement_ownership_is_consistent() {
        let config = EngineConfig::new(standard_catalog(), Roster::one_per_strategy(2000.0));
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);

        let sold_count = engine.items().iter().filter(|item| item.sold).count();
        let won_count: usize = engine
            .participants()
            .iter()
            .map(|p| p.items_won.len())
            .sum();
        assert_eq!(sold_count, won_count);

        for item in engine.items().iter().filter(|item| item.sold) {
            let winner = &engine.participants()[item.winner_id.unwrap()];
            assert_eq!(
                winner
                    .items_won
                    .iter()
                    .filter(|won| won.item_id == item.item_id)
                    .count(),
                1
            );
            // An accepted bid strictly raised the price, and the charge never
            // exceeds what the winner could afford at the time
            assert!(item.current_price > item.starting_price);
            assert!(item.final_price.unwrap() <= winner.initial_budget);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = Engine::new(duel_config());
        let fresh = engine.snapshot();
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        for _ in 0..7 {
            engine.tick(&mut logger);
        }
        engine.reset();
        let once = engine.snapshot();
        engine.reset();
        let twice = engine.snapshot();
        assert_eq!(once, twice);
        assert_eq!(once, fresh);
    }

    #[test]
    fn test_pause_preserves_round_progress() {
        let mut engine = Engine::new(duel_config());
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        for _ in 0..3 {
            engine.tick(&mut logger);
        }
        let clock_before = engine.round().unwrap().clock_remaining;
        let turn_before = engine.round().unwrap().turn_index;
        let item_before = engine.current_item().unwrap().item_id;
        engine.pause();
        assert_eq!(engine.phase(), EnginePhase::Paused);
        engine.tick(&mut logger);
        engine.tick(&mut logger);
        assert_eq!(engine.round().unwrap().clock_remaining, clock_before);
        assert_eq!(engine.round().unwrap().turn_index, turn_before);
        assert_eq!(engine.current_item().unwrap().item_id, item_before);
        engine.resume();
        assert_eq!(engine.phase(), EnginePhase::Running);
        engine.tick(&mut logger);
        assert_eq!(engine.round().unwrap().clock_remaining, clock_before - 1);
    }

    #[test]
    fn test_single_item_duel_outcome() {
        // Greedy vs budget pacing on a 300-value item opening at 50: the
        // greedy chase guarantees at least one accepted bid, so the item
        // sells, capped by the chaser's 0.9 value ceiling, and the loser's
        // budget is untouched
        let mut engine = Engine::new(duel_config());
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);

        let item = &engine.items()[0];
        assert!(item.sold);
        let winner = item.winner_id.unwrap();
        assert!(item.final_price.unwrap() <= 270.0);
        assert!(item.final_price.unwrap() <= 500.0);
        let loser = 1 - winner;
        assert_eq!(engine.participants()[loser].remaining_budget, 500.0);
        assert_eq!(engine.participants()[loser].total_spent, 0.0);
    }

    #[test]
    fn test_reserve_threshold_retires_participant() {
        // A 60-budget bidder wins the first lot cheaply, falls under the
        // 50-unit reserve and must sit out the rest of the simulation
        let catalog = vec![
            ItemTemplate::new("Small Print", Category::Art, 300.0, 30.0),
            ItemTemplate::new("Large Print", Category::Art, 300.0, 50.0),
        ];
        let mut roster = Roster::new();
        roster.add("Shoestring Agent", StrategyKind::GREEDY, 60.0);
        let mut engine = Engine::new(EngineConfig::new(catalog, roster));
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);

        let participant = &engine.participants()[0];
        assert!(!participant.active);
        assert_eq!(participant.items_won.len(), 1);
        assert!(participant.remaining_budget < 50.0);
        assert!(!engine.items()[1].sold);
        assert_eq!(engine.items()[1].winner_id, None);
    }

    #[test]
    fn test_round_with_no_bids_passes_unsold() {
        // Opening at 95 on a 100-value lot leaves every threshold unmet:
        // greedy and pacing see no headroom, density is nowhere near 1.5,
        // and counter bids cannot clear the opening price
        let catalog = vec![ItemTemplate::new(
            "Overpriced Vase",
            Category::Collectibles,
            100.0,
            95.0,
        )];
        let config = EngineConfig::new(catalog, Roster::one_per_strategy(1000.0));
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);

        let item = &engine.items()[0];
        assert!(!item.sold);
        assert_eq!(item.winner_id, None);
        assert_eq!(item.current_price, 95.0);
        for participant in engine.participants() {
            assert_eq!(participant.total_spent, 0.0);
            assert_eq!(participant.current_bid, 0.0);
        }
    }

    #[test]
    fn test_second_price_charge_never_exceeds_winning_bid() {
        let catalog = vec![ItemTemplate::new(
            "Premium Collectible",
            Category::Collectibles,
            750.0,
            200.0,
        )];
        let mut roster = Roster::new();
        roster.add("Counter Agent", StrategyKind::MINIMAX, 1000.0);
        roster.add("Density Agent", StrategyKind::KNAPSACK, 1000.0);
        let mut config = EngineConfig::new(catalog, roster);
        config.mode = BiddingMode::CONTINUOUS;
        config.pricing = PricingRule::SECOND_PRICE;
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);

        let item = &engine.items()[0];
        if item.sold {
            let charge = item.final_price.unwrap();
            assert!(charge <= item.current_price);
            assert!(charge >= item.starting_price);
        }
    }

    #[test]
    fn test_config_tuning_reaches_strategies() {
        // Tightening the greedy entry threshold below the opening ratio
        // (50 / 300) keeps the only bidder out entirely
        let catalog = vec![ItemTemplate::new(
            "Vintage Painting",
            Category::Art,
            300.0,
            50.0,
        )];
        let mut roster = Roster::new();
        roster.add("Greedy Agent", StrategyKind::GREEDY, 500.0);
        let mut config = EngineConfig::new(catalog, roster);
        config.tuning.greedy.value_ratio_threshold = 0.1;
        let mut engine = Engine::new(config);
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        engine.run_to_finish(&mut logger);
        assert!(!engine.items()[0].sold);
        assert_eq!(engine.participants()[0].total_spent, 0.0);
    }

    #[test]
    fn test_start_while_running_restarts() {
        let mut engine = Engine::new(duel_config());
        let mut logger = Logger::new();
        engine.start(&mut logger).unwrap();
        for _ in 0..5 {
            engine.tick(&mut logger);
        }
        engine.start(&mut logger).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Running);
        let round = engine.round().unwrap();
        assert_eq!(round.clock_remaining, 15);
        assert_eq!(round.turn_index, 0);
        for participant in engine.participants() {
            assert_eq!(participant.current_bid, 0.0);
            assert_eq!(participant.total_spent, 0.0);
        }
    }
}

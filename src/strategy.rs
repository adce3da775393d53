use rand::rngs::StdRng;
use crate::catalog::Item;

/// Everything a bid decision may look at, assembled by the engine for one
/// participant at one point in a round. The context is a read-only view;
/// strategies never mutate simulation state
pub struct DecisionContext<'a> {
    pub item: &'a Item,
    pub remaining_budget: f64,
    pub initial_budget: f64,
    /// Standing bids of the other active participants
    pub competitor_bids: &'a [f64],
    /// Sum of estimated values of unsold items still ahead in the catalog
    pub future_value: f64,
    pub clock_remaining: u32,
    pub clock_total: u32,
}

impl<'a> DecisionContext<'a> {
    /// Fraction of the round clock still to run
    pub fn time_ratio(&self) -> f64 {
        if self.clock_total == 0 {
            return 0.0;
        }
        self.clock_remaining as f64 / self.clock_total as f64
    }

    /// Fraction of the initial budget still unspent
    pub fn budget_ratio(&self) -> f64 {
        if self.initial_budget <= 0.0 {
            return 0.0;
        }
        self.remaining_budget / self.initial_budget
    }
}

/// Trait for bidding strategies
pub trait BidderStrategy {
    /// Decide whether to bid on the item in the given context
    /// Returns the proposed bid amount, or None to sit the tick out
    /// Pure apart from the injected random source; the engine validates and
    /// applies the result
    fn decide(&self, ctx: &DecisionContext, rng: &mut StdRng) -> Option<f64>;

    /// Get a string representation of the bidding approach
    fn strategy_name(&self) -> String;
}

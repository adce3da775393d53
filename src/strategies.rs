/// This is the file where the bidding strategies reside
/// A strategy is the sub-component that decides, for one participant on one
/// clock tick, whether to raise its standing bid on the item under the hammer
/// and by how much.
///
/// The four strategies carry the product's algorithm labels (greedy, dynamic,
/// minimax, knapsack) but are deliberately simple threshold heuristics with a
/// bounded random increment, not the textbook algorithms of those names.
/// All threshold constants live on the strategy structs so call sites share
/// one parameterization instead of re-deriving magic numbers.

use rand::rngs::StdRng;
use rand::Rng;

use crate::participants::StrategyKind;
pub use crate::strategy::{BidderStrategy, DecisionContext};

/// Bounded random raise added on top of a reference price, whole units
const BID_INCREMENT_MIN: u32 = 25;
const BID_INCREMENT_MAX: u32 = 75;

fn draw_increment(rng: &mut StdRng) -> f64 {
    rng.gen_range(BID_INCREMENT_MIN..=BID_INCREMENT_MAX) as f64
}

/// A participant with nothing left to spend, or an item already settled,
/// never produces a bid
fn out_of_play(ctx: &DecisionContext) -> bool {
    ctx.remaining_budget <= 0.0 || ctx.item.sold
}

/// Greedy strategy: chase any item still trading well below its estimated
/// value, raising by a random increment up to a fixed fraction of the value
#[derive(Clone)]
pub struct StrategyGreedy {
    /// Bid only while current_price / estimated_value stays below this
    pub value_ratio_threshold: f64,
    /// Never bid above this fraction of the estimated value
    pub value_cap_ratio: f64,
}

impl Default for StrategyGreedy {
    fn default() -> Self {
        Self {
            value_ratio_threshold: 0.8,
            value_cap_ratio: 0.9,
        }
    }
}

impl BidderStrategy for StrategyGreedy {
    fn decide(&self, ctx: &DecisionContext, rng: &mut StdRng) -> Option<f64> {
        if out_of_play(ctx) {
            return None;
        }
        let item = ctx.item;
        let value_ratio = item.current_price / item.estimated_value;
        if value_ratio >= self.value_ratio_threshold {
            return None;
        }
        let bid = (item.current_price + draw_increment(rng))
            .min((item.estimated_value * self.value_cap_ratio).ceil())
            .min(ctx.remaining_budget);
        if bid <= item.current_price {
            return None;
        }
        Some(bid)
    }

    fn strategy_name(&self) -> String {
        "Greedy value chase".to_string()
    }
}

/// Budget-pacing strategy (the product calls it "dynamic programming"):
/// bids toward a target that starts conservative and climbs as the round
/// clock runs out. In multi-item simulations a lookahead gate skips items
/// that are small next to what is still to come, unless the budget is
/// largely untouched
#[derive(Clone)]
pub struct StrategyDynamic {
    /// Target fraction of estimated value when the clock hits zero
    pub base_ratio: f64,
    /// How much of the target is withheld at full clock
    pub time_slope: f64,
    /// Participate only if the item is worth at least this share of the
    /// remaining future value
    pub lookahead_share: f64,
    /// ...or if the unspent budget fraction is still above this floor
    pub budget_ratio_floor: f64,
}

impl Default for StrategyDynamic {
    fn default() -> Self {
        Self {
            base_ratio: 0.75,
            time_slope: 0.25,
            lookahead_share: 0.3,
            budget_ratio_floor: 0.7,
        }
    }
}

impl BidderStrategy for StrategyDynamic {
    fn decide(&self, ctx: &DecisionContext, rng: &mut StdRng) -> Option<f64> {
        if out_of_play(ctx) {
            return None;
        }
        let item = ctx.item;

        // Lookahead gate only applies while future items remain
        if ctx.future_value > 0.0
            && item.estimated_value <= self.lookahead_share * ctx.future_value
            && ctx.budget_ratio() <= self.budget_ratio_floor
        {
            return None;
        }

        let target = item.estimated_value * (self.base_ratio - ctx.time_ratio() * self.time_slope);
        if item.current_price >= target {
            return None;
        }
        let bid = target
            .floor()
            .min(item.current_price + draw_increment(rng))
            .min(ctx.remaining_budget);
        if bid <= item.current_price {
            return None;
        }
        Some(bid)
    }

    fn strategy_name(&self) -> String {
        "Budget pacing".to_string()
    }
}

/// Counter-bidding strategy (the product calls it "minimax"): tops the
/// highest competing bid by a random increment, walking away once that
/// would cross a fixed fraction of the estimated value
#[derive(Clone)]
pub struct StrategyMinimax {
    /// Never bid above this fraction of the estimated value
    pub value_cap_ratio: f64,
}

impl Default for StrategyMinimax {
    fn default() -> Self {
        Self {
            value_cap_ratio: 0.85,
        }
    }
}

impl BidderStrategy for StrategyMinimax {
    fn decide(&self, ctx: &DecisionContext, rng: &mut StdRng) -> Option<f64> {
        if out_of_play(ctx) {
            return None;
        }
        let item = ctx.item;
        let competitor_max = ctx.competitor_bids.iter().cloned().fold(0.0, f64::max);
        let candidate = competitor_max + draw_increment(rng);
        let cap = (item.estimated_value * self.value_cap_ratio).ceil();
        if candidate > ctx.remaining_budget || candidate > cap {
            return None;
        }
        Some(candidate)
    }

    fn strategy_name(&self) -> String {
        "Counter bidding".to_string()
    }
}

/// Value-density strategy (the product calls it "knapsack"): jumps straight
/// to a fixed fraction of the estimated value, but only on items whose value
/// is a clear multiple of their current price
#[derive(Clone)]
pub struct StrategyKnapsack {
    /// Minimum estimated_value / current_price ratio to participate
    pub density_threshold: f64,
    /// The single jump bid as a fraction of estimated value
    pub value_cap_ratio: f64,
}

impl Default for StrategyKnapsack {
    fn default() -> Self {
        Self {
            density_threshold: 1.5,
            value_cap_ratio: 0.8,
        }
    }
}

impl BidderStrategy for StrategyKnapsack {
    fn decide(&self, ctx: &DecisionContext, _rng: &mut StdRng) -> Option<f64> {
        if out_of_play(ctx) {
            return None;
        }
        let item = ctx.item;
        let value_ratio = item.estimated_value / item.current_price;
        if value_ratio <= self.density_threshold {
            return None;
        }
        let bid = (item.estimated_value * self.value_cap_ratio)
            .ceil()
            .min(ctx.remaining_budget);
        Some(bid)
    }

    fn strategy_name(&self) -> String {
        "Value density".to_string()
    }
}

/// Threshold constants for every strategy kind, carried on the engine
/// configuration so all call sites share one parameterization
#[derive(Clone, Default)]
pub struct StrategyTuning {
    pub greedy: StrategyGreedy,
    pub dynamic: StrategyDynamic,
    pub minimax: StrategyMinimax,
    pub knapsack: StrategyKnapsack,
}

/// Create the boxed strategy for a kind from the given tuning
pub fn make_strategy(tuning: &StrategyTuning, kind: StrategyKind) -> Box<dyn BidderStrategy> {
    match kind {
        StrategyKind::GREEDY => Box::new(tuning.greedy.clone()),
        StrategyKind::DYNAMIC => Box::new(tuning.dynamic.clone()),
        StrategyKind::MINIMAX => Box::new(tuning.minimax.clone()),
        StrategyKind::KNAPSACK => Box::new(tuning.knapsack.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Item, ItemTemplate};
    use rand::SeedableRng;

    fn item(estimated_value: f64, current_price: f64) -> Item {
        let template = ItemTemplate::new("Vintage Painting", Category::Art, estimated_value, 50.0);
        let mut item = Item::from_template(0, &template);
        item.current_price = current_price;
        item
    }

    fn ctx<'a>(item: &'a Item, remaining_budget: f64, competitor_bids: &'a [f64]) -> DecisionContext<'a> {
        DecisionContext {
            item,
            remaining_budget,
            initial_budget: 1000.0,
            competitor_bids,
            future_value: 0.0,
            clock_remaining: 10,
            clock_total: 15,
        }
    }

    #[test]
    fn test_exhausted_budget_never_bids() {
        let item = item(300.0, 50.0);
        let context = ctx(&item, 0.0, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        let tuning = StrategyTuning::default();
        for kind in StrategyKind::all() {
            assert_eq!(make_strategy(&tuning, kind).decide(&context, &mut rng), None);
        }
    }

    #[test]
    fn test_sold_item_never_bids() {
        let mut sold = item(300.0, 200.0);
        sold.sold = true;
        let context = ctx(&sold, 1000.0, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        let tuning = StrategyTuning::default();
        for kind in StrategyKind::all() {
            assert_eq!(make_strategy(&tuning, kind).decide(&context, &mut rng), None);
        }
    }

    #[test]
    fn test_greedy_bids_below_threshold() {
        let item = item(300.0, 50.0);
        let context = ctx(&item, 500.0, &[]);
        let mut rng = StdRng::seed_from_u64(2);
        let bid = StrategyGreedy::default().decide(&context, &mut rng).unwrap();
        assert!(bid > 50.0);
        assert!(bid <= 270.0); // ceil(300 * 0.9)
        assert!(bid <= 50.0 + BID_INCREMENT_MAX as f64);
    }

    #[test]
    fn test_greedy_declines_at_threshold() {
        // 250 / 300 > 0.8, too expensive to chase
        let item = item(300.0, 250.0);
        let context = ctx(&item, 500.0, &[]);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(StrategyGreedy::default().decide(&context, &mut rng), None);
    }

    #[test]
    fn test_greedy_respects_budget() {
        let item = item(300.0, 50.0);
        let context = ctx(&item, 60.0, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        let bid = StrategyGreedy::default().decide(&context, &mut rng).unwrap();
        assert!(bid <= 60.0);
    }

    #[test]
    fn test_dynamic_target_rises_as_clock_drains() {
        let strategy = StrategyDynamic::default();
        let item = item(400.0, 150.0);
        // Paced target is 400 * (0.75 - 1.0 * 0.25) = 200 at full clock and
        // 400 * 0.75 = 300 at zero clock, so the late raise can go higher
        let mut early = ctx(&item, 1000.0, &[]);
        early.clock_remaining = 15;
        early.clock_total = 15;
        let mut late = ctx(&item, 1000.0, &[]);
        late.clock_remaining = 0;
        late.clock_total = 15;
        let mut rng = StdRng::seed_from_u64(4);
        let early_bid = strategy.decide(&early, &mut rng);
        let mut rng = StdRng::seed_from_u64(4);
        let late_bid = strategy.decide(&late, &mut rng);
        assert!(early_bid.unwrap() <= late_bid.unwrap());
    }

    #[test]
    fn test_dynamic_lookahead_skips_small_items() {
        let item = item(100.0, 20.0);
        let mut context = ctx(&item, 600.0, &[]);
        // Item worth well under 30% of what is still to come, budget already
        // down to 60% - sit this one out
        context.future_value = 1000.0;
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(StrategyDynamic::default().decide(&context, &mut rng), None);
    }

    #[test]
    fn test_dynamic_lookahead_passes_on_high_budget() {
        let item = item(100.0, 20.0);
        let mut context = ctx(&item, 950.0, &[]);
        context.future_value = 1000.0;
        context.clock_remaining = 2;
        let mut rng = StdRng::seed_from_u64(5);
        assert!(StrategyDynamic::default().decide(&context, &mut rng).is_some());
    }

    #[test]
    fn test_minimax_tops_competitor_bids() {
        let item = item(1000.0, 100.0);
        let competitor_bids = [120.0, 180.0];
        let context = ctx(&item, 1000.0, &competitor_bids);
        let mut rng = StdRng::seed_from_u64(6);
        let bid = StrategyMinimax::default().decide(&context, &mut rng).unwrap();
        assert!(bid > 180.0);
        assert!(bid <= 180.0 + BID_INCREMENT_MAX as f64);
    }

    #[test]
    fn test_minimax_walks_away_at_cap() {
        let item = item(200.0, 100.0);
        // Cap is ceil(200 * 0.85) = 170; topping 160 would cross it
        let competitor_bids = [160.0];
        let context = ctx(&item, 1000.0, &competitor_bids);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(StrategyMinimax::default().decide(&context, &mut rng), None);
    }

    #[test]
    fn test_knapsack_requires_value_density() {
        let mut rng = StdRng::seed_from_u64(8);
        // 300 / 250 = 1.2, below the 1.5 density bar
        let thin = item(300.0, 250.0);
        let context = ctx(&thin, 1000.0, &[]);
        assert_eq!(StrategyKnapsack::default().decide(&context, &mut rng), None);

        // 300 / 100 = 3.0 clears it; the jump bid is ceil(300 * 0.8) = 240
        let dense = item(300.0, 100.0);
        let context = ctx(&dense, 1000.0, &[]);
        assert_eq!(StrategyKnapsack::default().decide(&context, &mut rng), Some(240.0));
    }

    #[test]
    fn test_knapsack_clamps_to_budget() {
        let dense = item(300.0, 100.0);
        let context = ctx(&dense, 150.0, &[]);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(StrategyKnapsack::default().decide(&context, &mut rng), Some(150.0));
    }
}

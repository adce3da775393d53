/// Batch comparison runs: many complete simulations over randomized
/// catalogs, one bidder per strategy kind, aggregated into per-strategy
/// totals. This is the data source for the analysis report and the charts.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::{generate_catalog, savings_pct, CatalogParam};
use crate::engine::{ConfigError, Engine, EngineConfig};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::participants::{Roster, StrategyKind};
use crate::utils::{get_seed, lognormal_dist};
use rand_distr::Uniform;

/// Randomness stream for catalog generation (see utils::get_seed)
const RNG_STREAM_CATALOG: u64 = 7117;

/// Parameters for a batch of comparison runs
pub struct BatchParam {
    pub runs: usize,
    pub items_per_run: usize,
    /// Budget handed to every strategy's bidder in every run
    pub budget: f64,
    pub catalog_param: CatalogParam,
}

impl BatchParam {
    /// The default comparison batch: 100 runs of 4-item catalogs with
    /// log-normally distributed item values
    pub fn standard(runs: usize) -> Self {
        Self {
            runs,
            items_per_run: 4,
            budget: 1500.0,
            catalog_param: CatalogParam::new(lognormal_dist(500.0, 250.0), Uniform::new(0.2, 0.5)),
        }
    }
}

/// Aggregated results for one strategy kind across the batch
pub struct StrategySummary {
    pub kind: StrategyKind,
    /// Runs in which this strategy finished with the strictly best net profit
    pub run_wins: usize,
    pub items_won: usize,
    pub total_spent: f64,
    pub net_profit: f64,
    savings_pct_sum: f64,
    savings_samples: usize,
}

impl StrategySummary {
    fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            run_wins: 0,
            items_won: 0,
            total_spent: 0.0,
            net_profit: 0.0,
            savings_pct_sum: 0.0,
            savings_samples: 0,
        }
    }

    /// Mean savings percentage across every item this strategy won
    pub fn avg_savings_pct(&self) -> f64 {
        if self.savings_samples == 0 {
            return 0.0;
        }
        self.savings_pct_sum / self.savings_samples as f64
    }
}

/// Aggregated results of a whole batch
pub struct BatchStat {
    pub runs: usize,
    pub items_offered: usize,
    pub items_sold: usize,
    pub total_charged: f64,
    pub summaries: Vec<StrategySummary>,
}

impl BatchStat {
    /// The strategy with the greatest accumulated net profit
    pub fn best_strategy(&self) -> &StrategySummary {
        self.summaries
            .iter()
            .max_by(|a, b| a.net_profit.total_cmp(&b.net_profit))
            .expect("batch always carries one summary per strategy kind")
    }

    /// Fraction of offered items that found a buyer, as a percentage
    pub fn sell_through_pct(&self) -> f64 {
        if self.items_offered == 0 {
            return 0.0;
        }
        self.items_sold as f64 / self.items_offered as f64 * 100.0
    }

    /// Output the aggregate comparison
    pub fn printout(&self, logger: &mut Logger) {
        logln!(logger, LogEvent::Batch, "\n=== Batch Comparison ({} runs) ===", self.runs);
        logln!(
            logger,
            LogEvent::Batch,
            "Items sold: {}/{} ({:.1}%), {:.0} charged in total",
            self.items_sold,
            self.items_offered,
            self.sell_through_pct(),
            self.total_charged
        );
        for summary in &self.summaries {
            logln!(
                logger,
                LogEvent::Batch,
                "  {:<10} run wins {:>3}  items {:>3}  spent {:>8.0}  net {:>8.0}  avg savings {:>5.1}%",
                summary.kind.name(),
                summary.run_wins,
                summary.items_won,
                summary.total_spent,
                summary.net_profit,
                summary.avg_savings_pct()
            );
        }
    }
}

/// Run `params.runs` independent simulations and aggregate the outcomes
/// Catalogs are drawn from the batch randomness stream, so the whole batch is
/// reproducible for a fixed global seed
pub fn run_batch(params: &BatchParam, logger: &mut Logger) -> Result<BatchStat, ConfigError> {
    let mut catalog_rng = StdRng::seed_from_u64(get_seed(RNG_STREAM_CATALOG));
    let mut summaries: Vec<StrategySummary> = StrategyKind::all()
        .into_iter()
        .map(StrategySummary::new)
        .collect();
    let mut items_offered = 0;
    let mut items_sold = 0;
    let mut total_charged = 0.0;

    for run in 0..params.runs {
        let templates = generate_catalog(&params.catalog_param, params.items_per_run, &mut catalog_rng);
        let roster = Roster::one_per_strategy(params.budget);
        let mut engine = Engine::new(EngineConfig::new(templates, roster));
        engine.start(logger)?;
        engine.run_to_finish(logger);

        items_offered += engine.items().len();
        for item in engine.items() {
            if item.sold {
                items_sold += 1;
                total_charged += item.final_price.unwrap_or(0.0);
            }
        }

        // The roster is built in StrategyKind::all() order, so participant
        // index and summary index line up
        let mut best_run_index: Option<usize> = None;
        let mut best_run_net = f64::NEG_INFINITY;
        for (index, participant) in engine.participants().iter().enumerate() {
            let summary = &mut summaries[index];
            summary.items_won += participant.items_won.len();
            summary.total_spent += participant.total_spent;
            summary.net_profit += participant.net_profit();
            for item in &participant.items_won {
                if let Some(charge) = item.final_price {
                    summary.savings_pct_sum += savings_pct(item.estimated_value, charge);
                    summary.savings_samples += 1;
                }
            }
            if participant.net_profit() > best_run_net {
                best_run_net = participant.net_profit();
                best_run_index = Some(index);
            }
        }
        // A run where nobody made money crowns no winner
        if let Some(index) = best_run_index {
            if best_run_net > 0.0 {
                summaries[index].run_wins += 1;
            }
        }

        logln!(
            logger,
            LogEvent::Simulation,
            "Batch run {}/{} complete",
            run + 1,
            params.runs
        );
    }

    let stat = BatchStat {
        runs: params.runs,
        items_offered,
        items_sold,
        total_charged,
        summaries,
    };
    stat.printout(logger);
    Ok(stat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_aggregates_every_strategy() {
        let params = BatchParam::standard(5);
        let mut logger = Logger::new();
        let stat = run_batch(&params, &mut logger).unwrap();
        assert_eq!(stat.runs, 5);
        assert_eq!(stat.items_offered, 20);
        assert!(stat.items_sold <= stat.items_offered);
        assert_eq!(stat.summaries.len(), 4);
        let total_items_won: usize = stat.summaries.iter().map(|s| s.items_won).sum();
        assert_eq!(total_items_won, stat.items_sold);
        let total_run_wins: usize = stat.summaries.iter().map(|s| s.run_wins).sum();
        assert!(total_run_wins <= stat.runs);
    }

    #[test]
    fn test_best_strategy_is_stable() {
        let params = BatchParam::standard(3);
        let mut logger = Logger::new();
        let stat = run_batch(&params, &mut logger).unwrap();
        let best = stat.best_strategy();
        for summary in &stat.summaries {
            assert!(best.net_profit >= summary.net_profit);
        }
    }
}

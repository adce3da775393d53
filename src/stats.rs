use crate::catalog::{savings_pct, Item};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::participant::Participant;

/// Derived metrics for a single participant
/// Pure arithmetic over the frozen simulation state; no decision logic
pub struct ParticipantStat {
    pub items_won: usize,
    pub total_spent: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub net_profit: f64,
    /// Net profit per unit spent, as a percentage (0 when nothing was spent)
    pub efficiency: f64,
    /// Mean percentage of estimated value left on the table across won items
    pub avg_savings_pct: f64,
}

/// Overall outcome of one finished simulation
pub struct OverallStat {
    pub items_sold: usize,
    pub items_unsold: usize,
    pub total_charged: f64,
    /// Sum of estimated values of the items that found a buyer
    pub total_value_realized: f64,
}

/// Complete derived statistics for one finished simulation
pub struct SimulationStat {
    pub participant_stats: Vec<ParticipantStat>,
    pub overall_stat: OverallStat,
}

impl SimulationStat {
    /// Generate statistics from the final items and participants
    pub fn new(items: &[Item], participants: &[Participant]) -> Self {
        let participant_stats = participants
            .iter()
            .map(|participant| {
                let net_profit = participant.net_profit();
                let efficiency = if participant.total_spent > 0.0 {
                    net_profit / participant.total_spent * 100.0
                } else {
                    0.0
                };
                let savings: Vec<f64> = participant
                    .items_won
                    .iter()
                    .filter_map(|item| {
                        item.final_price
                            .map(|charge| savings_pct(item.estimated_value, charge))
                    })
                    .collect();
                let avg_savings_pct = if savings.is_empty() {
                    0.0
                } else {
                    savings.iter().sum::<f64>() / savings.len() as f64
                };
                ParticipantStat {
                    items_won: participant.items_won.len(),
                    total_spent: participant.total_spent,
                    total_profit: participant.total_profit,
                    total_loss: participant.total_loss,
                    net_profit,
                    efficiency,
                    avg_savings_pct,
                }
            })
            .collect();

        let mut overall_stat = OverallStat {
            items_sold: 0,
            items_unsold: 0,
            total_charged: 0.0,
            total_value_realized: 0.0,
        };
        for item in items {
            if item.sold {
                overall_stat.items_sold += 1;
                overall_stat.total_charged += item.final_price.unwrap_or(0.0);
                overall_stat.total_value_realized += item.estimated_value;
            } else {
                overall_stat.items_unsold += 1;
            }
        }

        Self {
            participant_stats,
            overall_stat,
        }
    }

    /// Output participant statistics (without header, for compact output)
    pub fn printout_participants(
        &self,
        participants: &[Participant],
        logger: &mut Logger,
        event: LogEvent,
    ) {
        for (index, stat) in self.participant_stats.iter().enumerate() {
            let participant = &participants[index];
            logln!(
                logger,
                event,
                "\nParticipant {} ({}) - {} strategy{}",
                participant.participant_id,
                participant.name,
                participant.strategy.name(),
                if participant.active { "" } else { " [retired]" }
            );
            logln!(
                logger,
                event,
                "  Items won: {} for {:.0} spent (budget {:.0})",
                stat.items_won,
                stat.total_spent,
                participant.initial_budget
            );
            logln!(
                logger,
                event,
                "  Profit/Loss: {:.0} / {:.0} (net {:.0})",
                stat.total_profit,
                stat.total_loss,
                stat.net_profit
            );
            logln!(
                logger,
                event,
                "  Efficiency: {:.1}%  Avg savings: {:.1}%",
                stat.efficiency,
                stat.avg_savings_pct
            );
        }
    }

    /// Output per-item outcomes
    pub fn printout_items(&self, items: &[Item], participants: &[Participant], logger: &mut Logger, event: LogEvent) {
        for item in items {
            match (item.sold, item.winner_id, item.final_price) {
                (true, Some(winner_id), Some(charge)) => {
                    logln!(
                        logger,
                        event,
                        "  {}. {} (value {:.0}): sold to {} for {:.0}",
                        item.item_id + 1,
                        item.name,
                        item.estimated_value,
                        participants[winner_id].name,
                        charge
                    );
                }
                _ => {
                    logln!(
                        logger,
                        event,
                        "  {}. {} (value {:.0}): unsold at {:.0}",
                        item.item_id + 1,
                        item.name,
                        item.estimated_value,
                        item.current_price
                    );
                }
            }
        }
    }

    /// Output only overall statistics (no per-participant breakdown)
    pub fn printout_overall(&self, logger: &mut Logger) {
        logln!(logger, LogEvent::Simulation, "\n=== Overall Statistics ===");
        logln!(
            logger,
            LogEvent::Simulation,
            "Items (sold/unsold): {} / {}",
            self.overall_stat.items_sold,
            self.overall_stat.items_unsold
        );
        logln!(
            logger,
            LogEvent::Simulation,
            "Total charged: {:.0} for {:.0} of estimated value",
            self.overall_stat.total_charged,
            self.overall_stat.total_value_realized
        );
    }

    /// Output complete statistics
    pub fn printout(&self, items: &[Item], participants: &[Participant], logger: &mut Logger) {
        logln!(logger, LogEvent::Simulation, "\n=== Participant Statistics ===");
        self.printout_participants(participants, logger, LogEvent::Simulation);
        logln!(logger, LogEvent::Simulation, "\n=== Item Outcomes ===");
        self.printout_items(items, participants, logger, LogEvent::Simulation);
        self.printout_overall(logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Item, ItemTemplate};
    use crate::participants::StrategyKind;

    fn sold_item(item_id: usize, estimated_value: f64, charge: f64, winner_id: usize) -> Item {
        let template = ItemTemplate::new("Rare Book Set", Category::Books, estimated_value, 80.0);
        let mut item = Item::from_template(item_id, &template);
        item.sold = true;
        item.winner_id = Some(winner_id);
        item.final_price = Some(charge);
        item.current_price = charge;
        item
    }

    #[test]
    fn test_stats_arithmetic() {
        let items = vec![
            sold_item(0, 400.0, 300.0, 0),
            sold_item(1, 200.0, 250.0, 0),
            Item::from_template(2, &ItemTemplate::new("Unloved Lamp", Category::Art, 100.0, 95.0)),
        ];
        let mut winner = Participant::new(0, "Greedy Agent", StrategyKind::GREEDY, 1000.0);
        winner.record_win(&items[0], 300.0);
        winner.record_win(&items[1], 250.0);
        let idle = Participant::new(1, "Dynamic Agent", StrategyKind::DYNAMIC, 1000.0);
        let participants = vec![winner, idle];

        let stats = SimulationStat::new(&items, &participants);

        let winner_stat = &stats.participant_stats[0];
        assert_eq!(winner_stat.items_won, 2);
        assert_eq!(winner_stat.total_spent, 550.0);
        // Profit 100 on the first item, loss 50 on the second
        assert_eq!(winner_stat.net_profit, 50.0);
        assert!((winner_stat.efficiency - 50.0 / 550.0 * 100.0).abs() < 1e-9);
        // Savings 25% and -25% average to zero
        assert!(winner_stat.avg_savings_pct.abs() < 1e-9);

        let idle_stat = &stats.participant_stats[1];
        assert_eq!(idle_stat.efficiency, 0.0);
        assert_eq!(idle_stat.items_won, 0);

        assert_eq!(stats.overall_stat.items_sold, 2);
        assert_eq!(stats.overall_stat.items_unsold, 1);
        assert_eq!(stats.overall_stat.total_charged, 550.0);
        assert_eq!(stats.overall_stat.total_value_realized, 600.0);
    }
}

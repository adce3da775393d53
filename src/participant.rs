use crate::catalog::Item;
use crate::participants::StrategyKind;

/// A bidder taking part in the simulation
/// Financial fields obey `remaining_budget == initial_budget - total_spent`
/// at all times; the engine checks the budget before accepting any bid
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub participant_id: usize,
    pub name: String,
    pub strategy: StrategyKind,
    pub initial_budget: f64,
    pub remaining_budget: f64,
    /// Standing bid on the item currently under the hammer, 0 between rounds
    pub current_bid: f64,
    pub items_won: Vec<Item>,
    pub total_spent: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    /// One-way flag: cleared when the remaining budget falls below the
    /// reserve threshold, never set again until a full restart
    pub active: bool,
}

impl Participant {
    pub fn new(participant_id: usize, name: &str, strategy: StrategyKind, initial_budget: f64) -> Self {
        Self {
            participant_id,
            name: name.to_string(),
            strategy,
            initial_budget,
            remaining_budget: initial_budget,
            current_bid: 0.0,
            items_won: Vec::new(),
            total_spent: 0.0,
            total_profit: 0.0,
            total_loss: 0.0,
            active: true,
        }
    }

    /// Restore the participant to its pre-simulation configuration
    pub fn reset(&mut self) {
        self.remaining_budget = self.initial_budget;
        self.current_bid = 0.0;
        self.items_won.clear();
        self.total_spent = 0.0;
        self.total_profit = 0.0;
        self.total_loss = 0.0;
        self.active = true;
    }

    /// Record a settled win: ownership, spend and profit/loss bookkeeping
    /// `charge` is what the winner actually pays (first or second price)
    pub fn record_win(&mut self, item: &Item, charge: f64) {
        self.items_won.push(item.clone());
        self.total_spent += charge;
        self.remaining_budget -= charge;
        let profit = item.estimated_value - charge;
        if profit > 0.0 {
            self.total_profit += profit;
        } else {
            self.total_loss += profit.abs();
        }
    }

    pub fn net_profit(&self) -> f64 {
        self.total_profit - self.total_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Item, ItemTemplate};

    fn won_item(estimated_value: f64, charge: f64) -> Item {
        let template = ItemTemplate::new("Antique Watch", Category::Jewelry, estimated_value, 100.0);
        let mut item = Item::from_template(0, &template);
        item.sold = true;
        item.winner_id = Some(0);
        item.final_price = Some(charge);
        item.current_price = charge;
        item
    }

    #[test]
    fn test_record_win_profit() {
        let mut participant = Participant::new(0, "Greedy Agent", StrategyKind::GREEDY, 1000.0);
        let item = won_item(400.0, 250.0);
        participant.record_win(&item, 250.0);
        assert_eq!(participant.total_spent, 250.0);
        assert_eq!(participant.remaining_budget, 750.0);
        assert_eq!(participant.total_profit, 150.0);
        assert_eq!(participant.total_loss, 0.0);
        assert_eq!(participant.items_won.len(), 1);
    }

    #[test]
    fn test_record_win_loss() {
        let mut participant = Participant::new(0, "Greedy Agent", StrategyKind::GREEDY, 1000.0);
        let item = won_item(400.0, 450.0);
        participant.record_win(&item, 450.0);
        assert_eq!(participant.total_profit, 0.0);
        assert_eq!(participant.total_loss, 50.0);
        assert_eq!(participant.net_profit(), -50.0);
    }

    #[test]
    fn test_reset_restores_initial_configuration() {
        let mut participant = Participant::new(1, "Knapsack Agent", StrategyKind::KNAPSACK, 500.0);
        let item = won_item(400.0, 300.0);
        participant.record_win(&item, 300.0);
        participant.active = false;
        participant.reset();
        assert_eq!(participant.remaining_budget, 500.0);
        assert_eq!(participant.total_spent, 0.0);
        assert!(participant.items_won.is_empty());
        assert!(participant.active);
    }
}

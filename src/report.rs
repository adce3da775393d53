/// Plain-text analysis report generated from batch comparison results.
/// The layout is human-readable summary text, not a machine format; nothing
/// downstream parses it back.

use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::Path;

use crate::batch::BatchStat;
use crate::participants::StrategyKind;

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

fn use_case(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::GREEDY => "fast-moving auctions where sell-through matters more than margin",
        StrategyKind::DYNAMIC => "multi-item auctions where budget has to stretch across rounds",
        StrategyKind::MINIMAX => "competitive fields where reacting to rival bids pays off",
        StrategyKind::KNAPSACK => "underpriced catalogs with clear value-to-price spreads",
    }
}

/// Render the full report as a string
pub fn render_report(stat: &BatchStat) -> String {
    let mut out = String::new();
    out.push_str("AUCTION STRATEGY ANALYSIS REPORT\n");
    out.push_str("================================\n");

    let best = stat.best_strategy();

    section(&mut out, "EXECUTIVE SUMMARY");
    out.push_str(&format!("Simulations analyzed: {}\n", stat.runs));
    out.push_str(&format!(
        "Items offered: {} ({} sold, {:.1}% sell-through)\n",
        stat.items_offered,
        stat.items_sold,
        stat.sell_through_pct()
    ));
    out.push_str(&format!("Total value traded: {:.0}\n", stat.total_charged));
    out.push_str(&format!(
        "Best performing strategy: {} (net profit {:.0})\n",
        best.kind.name(),
        best.net_profit
    ));

    section(&mut out, "STRATEGY PERFORMANCE");
    for summary in &stat.summaries {
        out.push_str(&format!("\n{}:\n", summary.kind.name()));
        out.push_str(&format!("  - Run wins: {} of {}\n", summary.run_wins, stat.runs));
        out.push_str(&format!("  - Items won: {}\n", summary.items_won));
        out.push_str(&format!("  - Total spent: {:.0}\n", summary.total_spent));
        out.push_str(&format!("  - Net profit: {:.0}\n", summary.net_profit));
        out.push_str(&format!(
            "  - Average savings: {:.1}%\n",
            summary.avg_savings_pct()
        ));
    }

    section(&mut out, "KEY INSIGHTS");
    let mut insight_number = 1;
    out.push_str(&format!(
        "{}. {} accumulated the highest net profit across the batch\n",
        insight_number,
        best.kind.name()
    ));
    insight_number += 1;
    if let Some(savings_leader) = stat
        .summaries
        .iter()
        .filter(|summary| summary.items_won > 0)
        .max_by(|a, b| a.avg_savings_pct().total_cmp(&b.avg_savings_pct()))
    {
        out.push_str(&format!(
            "{}. {} bought furthest below estimated value ({:.1}% average savings)\n",
            insight_number,
            savings_leader.kind.name(),
            savings_leader.avg_savings_pct()
        ));
        insight_number += 1;
    }
    if stat.items_sold < stat.items_offered {
        out.push_str(&format!(
            "{}. {} of {} items found no buyer; every strategy's entry thresholds were unmet\n",
            insight_number,
            stat.items_offered - stat.items_sold,
            stat.items_offered
        ));
        insight_number += 1;
    }
    let contested = stat
        .summaries
        .iter()
        .filter(|summary| summary.run_wins > 0)
        .count();
    out.push_str(&format!(
        "{}. {} of 4 strategies won at least one run outright\n",
        insight_number, contested
    ));

    section(&mut out, "RECOMMENDATIONS");
    // Best performer first, the rest in roster order
    out.push_str(&format!(
        "1. Prefer {} for {}\n",
        best.kind.name(),
        use_case(best.kind)
    ));
    let mut rank = 2;
    for summary in &stat.summaries {
        if summary.kind == best.kind {
            continue;
        }
        out.push_str(&format!(
            "{}. Consider {} for {}\n",
            rank,
            summary.kind.name(),
            use_case(summary.kind)
        ));
        rank += 1;
    }

    out
}

/// Write the rendered report to the given path, creating parent directories
pub fn write_report(stat: &BatchStat, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(render_report(stat).as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{run_batch, BatchParam};
    use crate::logger::Logger;

    #[test]
    fn test_report_carries_all_sections() {
        let params = BatchParam::standard(2);
        let mut logger = Logger::new();
        let stat = run_batch(&params, &mut logger).unwrap();
        let report = render_report(&stat);
        assert!(report.contains("EXECUTIVE SUMMARY"));
        assert!(report.contains("STRATEGY PERFORMANCE"));
        assert!(report.contains("KEY INSIGHTS"));
        assert!(report.contains("RECOMMENDATIONS"));
        for kind in crate::participants::StrategyKind::all() {
            assert!(report.contains(kind.name()));
        }
    }
}

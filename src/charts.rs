use plotters::prelude::*;
use std::fs;

use crate::batch::{run_batch, BatchParam, BatchStat};
use crate::logger::Logger;
use crate::participants::StrategyKind;

/// Number of comparison runs behind the generated charts
const CHART_BATCH_RUNS: usize = 100;

fn strategy_color(kind: StrategyKind) -> RGBColor {
    match kind {
        StrategyKind::GREEDY => BLUE,
        StrategyKind::DYNAMIC => GREEN,
        StrategyKind::MINIMAX => MAGENTA,
        StrategyKind::KNAPSACK => RED,
    }
}

/// Main function to generate all charts
/// Runs the standard comparison batch and renders one PNG per metric
pub fn generate_all_charts(logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    // Create charts directory if it doesn't exist
    fs::create_dir_all("charts")?;

    let stat = run_batch(&BatchParam::standard(CHART_BATCH_RUNS), logger)?;

    generate_net_profit_chart(&stat)?;
    generate_run_wins_chart(&stat)?;

    Ok(())
}

/// Net profit accumulated by each strategy across the batch
fn generate_net_profit_chart(stat: &BatchStat) -> Result<(), Box<dyn std::error::Error>> {
    let bars: Vec<(StrategyKind, f64)> = stat
        .summaries
        .iter()
        .map(|summary| (summary.kind, summary.net_profit))
        .collect();

    create_strategy_bar_chart(
        &bars,
        &format!("Net Profit by Strategy ({} runs)", stat.runs),
        "charts/strategy_net_profit.png",
        "Net Profit",
    )?;

    Ok(())
}

/// Runs won outright by each strategy across the batch
fn generate_run_wins_chart(stat: &BatchStat) -> Result<(), Box<dyn std::error::Error>> {
    let bars: Vec<(StrategyKind, f64)> = stat
        .summaries
        .iter()
        .map(|summary| (summary.kind, summary.run_wins as f64))
        .collect();

    create_strategy_bar_chart(
        &bars,
        &format!("Run Wins by Strategy ({} runs)", stat.runs),
        "charts/strategy_run_wins.png",
        "Run Wins",
    )?;

    Ok(())
}

/// Draw one labelled bar per strategy
fn create_strategy_bar_chart(
    bars: &[(StrategyKind, f64)],
    title: &str,
    filename: &str,
    y_label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if bars.is_empty() {
        return Err("Cannot create chart: no strategy data".into());
    }

    let max_val = bars.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let min_val = bars.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    // Keep zero in frame and leave headroom above the tallest bar
    let y_top = if max_val > 0.0 { max_val * 1.1 } else { 1.0 };
    let y_bottom = if min_val < 0.0 { min_val * 1.1 } else { 0.0 };

    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..bars.len() as f64, y_bottom..y_top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(y_label)
        .draw()?;

    for (index, (kind, value)) in bars.iter().enumerate() {
        let color = strategy_color(*kind);
        let x0 = index as f64 + 0.2;
        let x1 = index as f64 + 0.8;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, 0.0), (x1, *value)],
                color.filled(),
            )))?
            .label(format!("{}: {:.0}", kind.name(), value))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;

    println!("Chart saved to {}", filename);

    Ok(())
}

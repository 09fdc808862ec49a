//! Human-readable output: reach line, modes line, summary block and a text histogram.

use crate::simulation::statistics::{HistogramBin, WalkStatistics};

/// `Chance to reach floor 60: 12.4%`
pub fn format_reach_line(threshold: u32, percentage: f64) -> String {
    format!("Chance to reach floor {}: {}%", threshold, percentage)
}

/// `Most frequent final floor(s): 71, 74`
pub fn format_modes_line(modes: &[u32]) -> String {
    let joined = modes
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Most frequent final floor(s): {}", joined)
}

/// Summary block in the style of the simulator's console output.
pub fn format_summary(stats: &WalkStatistics) -> String {
    let t = &stats.terminal;
    let p = &t.percentiles;
    let mut lines = vec![
        format!(
            "Final floor distribution ({} walks x {} steps, seed {}):",
            stats.trial_count, stats.step_count, stats.seed
        ),
        format!("  Mean:        {:.2}", t.mean),
        format!("  Std dev:     {:.2}", t.std_dev),
        format!("  Min:         {}", t.min),
        format!("  Max:         {}", t.max),
        format!("  Median:      {}", t.median),
        format!(
            "  Percentiles: p5={} p25={} p75={} p95={} p99={}",
            p.p5, p.p25, p.p75, p.p95, p.p99
        ),
        format!(
            "  Reached {}:  {} of {} walks",
            stats.threshold, stats.reach_count, stats.trial_count
        ),
    ];
    if stats.reach_divisor != stats.trial_count {
        lines.push(format!(
            "  Note:        percentage divided by {} instead of {} walks",
            stats.reach_divisor, stats.trial_count
        ));
    }
    lines.push(format!(
        "  Mode count:  {} walks per modal floor",
        stats.mode_count
    ));
    lines.join("\n")
}

/// Render bins as a horizontal bar chart, longest bar `width` characters.
pub fn render_histogram(bins: &[HistogramBin], width: usize) -> String {
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let mut out = String::new();
    for bin in bins {
        let bar_len = if max_count == 0 {
            0
        } else {
            // Round up so every non-empty bin shows at least one mark.
            (bin.count * width).div_ceil(max_count)
        };
        out.push_str(&format!(
            "{:>7.1} - {:>7.1} | {:<w$} {}\n",
            bin.lower,
            bin.upper,
            "#".repeat(bar_len),
            bin.count,
            w = width
        ));
    }
    out
}

//! Text rendering for reports and history.
//!
//! Pure formatting over controller snapshots; no state lives here.

use colored::{ColoredString, Colorize};

use insightforge_core::report::{HistoryItem, Report};
use insightforge_core::theme::ThemeMode;

const BAR_WIDTH: usize = 30;

fn accent(text: &str, theme: ThemeMode) -> ColoredString {
    match theme {
        ThemeMode::Light => text.blue().bold(),
        ThemeMode::Dark => text.bright_cyan().bold(),
    }
}

fn heading(text: &str, theme: ThemeMode) -> String {
    format!("\n{}\n{}", accent(text, theme), "-".repeat(text.len()))
}

/// A horizontal bar scaled against `max`, for the inline charts.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

/// Renders a full report as sectioned text with inline bar charts.
pub fn render_report(report: &Report, theme: ThemeMode) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}  {}\n",
        accent(&report.startup_name, theme),
        format!("({})", report.target_sector).dimmed()
    ));
    out.push_str(&format!(
        "{}\n",
        format!(
            "Generated {}  |  {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC"),
            report.id
        )
        .dimmed()
    ));
    out.push_str(&format!("Objective: {}\n", report.objective));

    out.push_str(&heading("Executive Summary", theme));
    out.push_str(&format!("\n{}\n", report.executive_summary));

    out.push_str(&heading("Market Analysis", theme));
    out.push_str(&format!(
        "\nMarket size: {}\n\nKey trends:\n",
        report.market_analysis.market_size
    ));
    for trend in &report.market_analysis.key_trends {
        out.push_str(&format!("  • {trend}\n"));
    }
    out.push_str("\nCompetitive landscape:\n");
    for entry in &report.market_analysis.competitive_landscape {
        out.push_str(&format!(
            "  {}\n    strengths:  {}\n    weaknesses: {}\n",
            entry.competitor.bold(),
            entry.strengths,
            entry.weaknesses
        ));
    }

    out.push_str(&heading("Data Insights", theme));
    out.push_str("\nCompetitor funding ($M):\n");
    let max_funding = report
        .data_insights
        .competitor_metrics
        .iter()
        .map(|m| m.funding)
        .fold(0.0_f64, f64::max);
    for metric in &report.data_insights.competitor_metrics {
        out.push_str(&format!(
            "  {:<18} {:>6.0}  {}\n",
            metric.name,
            metric.funding,
            bar(metric.funding, max_funding, BAR_WIDTH)
        ));
    }
    out.push_str("\nMarket share (%):\n");
    let max_share = report
        .data_insights
        .market_share
        .iter()
        .map(|s| s.value)
        .fold(0.0_f64, f64::max);
    for slice in &report.data_insights.market_share {
        out.push_str(&format!(
            "  {:<18} {:>5.1}  {}\n",
            slice.name,
            slice.value,
            bar(slice.value, max_share, BAR_WIDTH)
        ));
    }
    let figures = &report.data_insights.key_figures;
    out.push_str(&format!(
        "\nKey figures:\n  Market valuation: {}\n  Growth rate:      {}\n  User adoption:    {}\n",
        figures.market_valuation, figures.growth_rate, figures.user_adoption
    ));

    out.push_str(&heading("Strategic Perspectives", theme));
    out.push_str(&format!("\n{}\n", report.strategic_perspectives));

    out
}

/// Renders the history panel: newest first, numbered for `/open <n>`.
pub fn render_history(history: &[HistoryItem]) -> String {
    if history.is_empty() {
        return "No reports yet. Submit the research form to generate one.".to_string();
    }
    let mut out = String::from("Past research (newest first):\n");
    for (index, item) in history.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}. {}  {}\n",
            index + 1,
            item.startup_name.bold(),
            item.generated_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
                .dimmed()
        ));
    }
    out
}

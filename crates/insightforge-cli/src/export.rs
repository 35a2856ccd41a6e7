//! Report export capability.
//!
//! Export backends are probed through [`ReportExporter`] rather than ambient
//! global state, so the REPL can disable the action when no backend is
//! available. The bundled backend writes Markdown.

use std::path::Path;

use insightforge_core::error::{ForgeError, Result};
use insightforge_core::report::Report;

/// An export backend for generated reports.
pub trait ReportExporter {
    /// Whether this backend can export right now.
    fn available(&self) -> bool;

    /// Short name of the output format, for messages.
    fn format_name(&self) -> &'static str;

    /// Writes `report` to `path`.
    fn export(&self, report: &Report, path: &Path) -> Result<()>;
}

/// Markdown export backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl ReportExporter for MarkdownExporter {
    fn available(&self) -> bool {
        true
    }

    fn format_name(&self) -> &'static str {
        "Markdown"
    }

    fn export(&self, report: &Report, path: &Path) -> Result<()> {
        std::fs::write(path, to_markdown(report)).map_err(|e| {
            ForgeError::io(format!("Failed to export report to {}: {}", path.display(), e))
        })
    }
}

/// Renders a report as a standalone Markdown document.
pub fn to_markdown(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Market Research Report: {}\n\n", report.startup_name));
    out.push_str(&format!("- **Target sector:** {}\n", report.target_sector));
    out.push_str(&format!("- **Objective:** {}\n", report.objective));
    out.push_str(&format!(
        "- **Generated:** {}\n\n",
        report.generated_at.to_rfc3339()
    ));

    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!("{}\n\n", report.executive_summary));

    out.push_str("## Market Analysis\n\n");
    out.push_str(&format!(
        "**Market size:** {}\n\n### Key Trends\n\n",
        report.market_analysis.market_size
    ));
    for trend in &report.market_analysis.key_trends {
        out.push_str(&format!("- {trend}\n"));
    }
    out.push_str("\n### Competitive Landscape\n\n");
    out.push_str("| Competitor | Strengths | Weaknesses |\n|---|---|---|\n");
    for entry in &report.market_analysis.competitive_landscape {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.competitor, entry.strengths, entry.weaknesses
        ));
    }

    out.push_str("\n## Data Insights\n\n### Competitor Metrics\n\n");
    out.push_str("| Name | Funding ($M) | Users |\n|---|---|---|\n");
    for metric in &report.data_insights.competitor_metrics {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            metric.name, metric.funding, metric.users
        ));
    }
    out.push_str("\n### Market Share\n\n| Name | Share (%) |\n|---|---|\n");
    for slice in &report.data_insights.market_share {
        out.push_str(&format!("| {} | {} |\n", slice.name, slice.value));
    }
    let figures = &report.data_insights.key_figures;
    out.push_str(&format!(
        "\n### Key Figures\n\n- **Market valuation:** {}\n- **Growth rate:** {}\n- **User adoption:** {}\n",
        figures.market_valuation, figures.growth_rate, figures.user_adoption
    ));

    out.push_str("\n## Strategic Perspectives\n\n");
    out.push_str(&format!("{}\n", report.strategic_perspectives));

    out
}

/// Default export file name for a report.
pub fn default_export_path(report: &Report) -> String {
    let stem: String = report
        .startup_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{}-report.md", stem.trim_matches('-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use insightforge_core::report::{
        CompetitiveEntry, CompetitorMetric, DataInsights, KeyFigures, MarketAnalysis,
        MarketShareSlice,
    };

    fn sample_report() -> Report {
        Report {
            id: "rep-1".to_string(),
            startup_name: "Acme Labs".to_string(),
            target_sector: "Fintech".to_string(),
            objective: "test".to_string(),
            generated_at: Utc::now(),
            executive_summary: "Summary.".to_string(),
            market_analysis: MarketAnalysis {
                market_size: "$1B".to_string(),
                key_trends: vec!["Trend one.".to_string()],
                competitive_landscape: vec![CompetitiveEntry {
                    competitor: "Rival".to_string(),
                    strengths: "fast".to_string(),
                    weaknesses: "small".to_string(),
                }],
            },
            data_insights: DataInsights {
                competitor_metrics: vec![CompetitorMetric {
                    name: "Rival".to_string(),
                    funding: 100.0,
                    users: 10,
                }],
                market_share: vec![MarketShareSlice {
                    name: "Rival".to_string(),
                    value: 60.0,
                }],
                key_figures: KeyFigures {
                    market_valuation: "$2B".to_string(),
                    growth_rate: "10%".to_string(),
                    user_adoption: "early".to_string(),
                },
            },
            strategic_perspectives: "Perspectives.".to_string(),
        }
    }

    #[test]
    fn test_markdown_contains_sections_and_tables() {
        let md = to_markdown(&sample_report());
        assert!(md.starts_with("# Market Research Report: Acme Labs"));
        assert!(md.contains("## Executive Summary"));
        assert!(md.contains("| Rival | fast | small |"));
        assert!(md.contains("| Rival | 100 | 10 |"));
        assert!(md.contains("## Strategic Perspectives"));
    }

    #[test]
    fn test_default_export_path_is_sanitized() {
        assert_eq!(default_export_path(&sample_report()), "acme-labs-report.md");
    }

    #[test]
    fn test_exporter_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let exporter = MarkdownExporter;
        assert!(exporter.available());
        exporter.export(&sample_report(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Acme Labs"));
    }
}

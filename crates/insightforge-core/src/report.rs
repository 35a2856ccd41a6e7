//! Research report domain models.
//!
//! The serialized shape (camelCase field names, RFC 3339 timestamps) is the
//! durable contract for persisted history entries; renaming a field here
//! changes what older stored history can be read back as.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters collected from the research form.
///
/// Transient: constructed once per submission, consumed by the generation
/// request, never persisted. Attachments are opaque file handles; nothing
/// reads their contents.
#[derive(Debug, Clone, Default)]
pub struct ResearchRequest {
    pub startup_name: String,
    pub target_sector: String,
    pub objective: String,
    pub attachments: Vec<PathBuf>,
}

/// One competitor in the qualitative landscape section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveEntry {
    pub competitor: String,
    pub strengths: String,
    pub weaknesses: String,
}

/// Qualitative market analysis section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub market_size: String,
    pub key_trends: Vec<String>,
    pub competitive_landscape: Vec<CompetitiveEntry>,
}

/// One row of the competitor funding/user comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorMetric {
    pub name: String,
    /// Funding in millions of dollars
    pub funding: f64,
    pub users: u64,
}

/// One slice of the market share breakdown, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketShareSlice {
    pub name: String,
    pub value: f64,
}

/// Headline figures shown alongside the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFigures {
    pub market_valuation: String,
    pub growth_rate: String,
    pub user_adoption: String,
}

/// Quantitative data section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataInsights {
    pub competitor_metrics: Vec<CompetitorMetric>,
    pub market_share: Vec<MarketShareSlice>,
    pub key_figures: KeyFigures,
}

/// A generated market-research report. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub startup_name: String,
    pub target_sector: String,
    pub objective: String,
    pub generated_at: DateTime<Utc>,
    pub executive_summary: String,
    pub market_analysis: MarketAnalysis,
    pub data_insights: DataInsights,
    pub strategic_perspectives: String,
}

/// A persisted record pairing a generated report with its identifying
/// metadata for later recall from the history panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub startup_name: String,
    pub generated_at: DateTime<Utc>,
    pub report: Report,
}

impl HistoryItem {
    /// Builds the history record for a freshly generated report.
    pub fn from_report(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            startup_name: report.startup_name.clone(),
            generated_at: report.generated_at,
            report: report.clone(),
        }
    }
}

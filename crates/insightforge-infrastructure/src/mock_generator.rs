//! Fixed-delay mock report generator.
//!
//! Stands in for a real analysis backend behind [`ReportGenerator`]. The
//! report content is deterministic mock data; only the startup name from the
//! request is echoed into the result (and into one synthetic row of the
//! competitor metrics). The delay simulates a slow remote call and is not
//! derived from the input.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use insightforge_core::error::Result;
use insightforge_core::generator::ReportGenerator;
use insightforge_core::report::{
    CompetitiveEntry, CompetitorMetric, DataInsights, KeyFigures, MarketAnalysis,
    MarketShareSlice, Report, ResearchRequest,
};

const DEFAULT_STARTUP_NAME: &str = "InnovateAI";
const DEFAULT_TARGET_SECTOR: &str = "Artificial Intelligence in Healthcare";
const DEFAULT_OBJECTIVE: &str =
    "To assess the market viability and competitive landscape for an AI-powered diagnostic tool.";

/// Mock generator returning a constant report after a fixed delay.
pub struct MockReportGenerator {
    delay: Duration,
}

impl MockReportGenerator {
    /// Delay used by the production configuration, matching the simulated
    /// 4.5-second API call of the original service.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(4500);

    pub fn new() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn build_report(request: &ResearchRequest) -> Report {
        let startup_name = non_empty(&request.startup_name, DEFAULT_STARTUP_NAME);
        // The synthetic row for the requesting startup keeps a distinct
        // fallback label so it reads as an estimate in the chart.
        let metrics_name = non_empty(&request.startup_name, "InnovateAI (est.)");

        Report {
            id: format!("rep-{}", Utc::now().timestamp_millis()),
            startup_name,
            target_sector: non_empty(&request.target_sector, DEFAULT_TARGET_SECTOR),
            objective: non_empty(&request.objective, DEFAULT_OBJECTIVE),
            generated_at: Utc::now(),
            executive_summary: "InnovateAI shows significant potential in a rapidly growing \
                market. The primary challenge will be differentiating from established players \
                like HealthAI and MediScan. Key opportunities lie in leveraging a proprietary \
                algorithm for faster and more accurate diagnostics, targeting underserved niche \
                medical fields initially."
                .to_string(),
            market_analysis: MarketAnalysis {
                market_size: "$15.8 Billion (2023)".to_string(),
                key_trends: vec![
                    "Increasing adoption of AI/ML in diagnostics.".to_string(),
                    "Shift towards personalized and predictive medicine.".to_string(),
                    "Regulatory bodies creating clearer pathways for AI-based medical devices."
                        .to_string(),
                    "Demand for solutions that reduce healthcare professional burnout."
                        .to_string(),
                ],
                competitive_landscape: vec![
                    CompetitiveEntry {
                        competitor: "HealthAI".to_string(),
                        strengths: "Strong brand recognition, large existing hospital network."
                            .to_string(),
                        weaknesses: "Slower to adopt new deep learning models, higher price \
                            point."
                            .to_string(),
                    },
                    CompetitiveEntry {
                        competitor: "MediScan".to_string(),
                        strengths: "Excellent user interface, strong in radiological imaging."
                            .to_string(),
                        weaknesses: "Limited to specific imaging modalities, less flexible \
                            platform."
                            .to_string(),
                    },
                    CompetitiveEntry {
                        competitor: "DataCure".to_string(),
                        strengths: "Focus on data aggregation and analytics.".to_string(),
                        weaknesses: "Not a direct diagnostic tool, potential competitor and \
                            partner."
                            .to_string(),
                    },
                ],
            },
            data_insights: DataInsights {
                competitor_metrics: vec![
                    CompetitorMetric {
                        name: "HealthAI".to_string(),
                        funding: 150.0,
                        users: 50_000,
                    },
                    CompetitorMetric {
                        name: "MediScan".to_string(),
                        funding: 80.0,
                        users: 120_000,
                    },
                    CompetitorMetric {
                        name: "DataCure".to_string(),
                        funding: 120.0,
                        users: 25_000,
                    },
                    CompetitorMetric {
                        name: metrics_name,
                        funding: 10.0,
                        users: 0,
                    },
                ],
                market_share: vec![
                    MarketShareSlice {
                        name: "HealthAI".to_string(),
                        value: 45.0,
                    },
                    MarketShareSlice {
                        name: "MediScan".to_string(),
                        value: 30.0,
                    },
                    MarketShareSlice {
                        name: "DataCure".to_string(),
                        value: 15.0,
                    },
                    MarketShareSlice {
                        name: "Other".to_string(),
                        value: 10.0,
                    },
                ],
                key_figures: KeyFigures {
                    market_valuation: "$45 Billion by 2029".to_string(),
                    growth_rate: "28% CAGR".to_string(),
                    user_adoption: "Early-stage, projected 5x growth in 3 years".to_string(),
                },
            },
            strategic_perspectives: "Initial focus should be on a specific, high-pain-point \
                diagnostic area where current solutions are slow or inaccurate. Secure pilot \
                programs with mid-sized clinics to build case studies. A flexible, API-first \
                approach could open partnership opportunities with larger players like \
                DataCure. Fundraising efforts should highlight the proprietary technology and \
                the clear go-to-market strategy."
                .to_string(),
        }
    }
}

impl Default for MockReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[async_trait]
impl ReportGenerator for MockReportGenerator {
    async fn generate(&self, request: ResearchRequest) -> Result<Report> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::build_report(&request))
    }
}

//! Report generation seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::report::{Report, ResearchRequest};

/// Asynchronous report generation backend.
///
/// The application controller only ever talks to this trait, so the bundled
/// fixed-delay mock can be swapped for a real analysis backend without
/// touching the state machine.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Produces a report for the given research request.
    async fn generate(&self, request: ResearchRequest) -> Result<Report>;
}

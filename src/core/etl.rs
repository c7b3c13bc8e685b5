use crate::core::Pipeline;
use crate::domain::model::EnrichmentStats;
use crate::utils::error::Result;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub stats: EnrichmentStats,
}

pub struct EnrichmentEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EnrichmentEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform, load. Any error aborts the run before the output is written.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting enrichment run");

        tracing::debug!("Extracting rows...");
        let rows = self.pipeline.extract().await?;

        tracing::debug!("Enriching {} rows...", rows.len());
        let table = self.pipeline.transform(rows).await?;
        let stats = table.stats;

        tracing::debug!("Loading {} rows...", table.len());
        let output_path = self.pipeline.load(table).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(RunSummary { output_path, stats })
    }
}

use crate::core::Pipeline;
use crate::domain::model::ConversionStats;
use crate::utils::error::Result;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub written: usize,
    pub stats: ConversionStats,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting facility conversion");

        tracing::info!("📥 Extracting facilities...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} rows", raw_data.len());

        tracing::info!("🔄 Converting and geocoding...");
        let result = self.pipeline.transform(raw_data).await?;
        let stats = result.stats;
        tracing::info!(
            "🔄 Converted {} rows: {} visible, {} hidden, {} without visibility, {} geocoding failures",
            stats.rows_read,
            stats.visible,
            stats.hidden,
            stats.unknown_visibility,
            stats.geocode_failures
        );
        if stats.geocode_failures > 0 {
            tracing::warn!(
                "⚠️ {} facilities were written without coordinates",
                stats.geocode_failures
            );
        }

        let written = result.facilities.len();
        tracing::info!("💾 Writing {} facilities...", written);
        let output_path = self.pipeline.load(result.facilities).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            written,
            stats,
        })
    }
}

use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ETL process...");

        // Extract
        tracing::info!("📥 Loading season files...");
        let seasons = self.pipeline.extract().await?;
        let match_count: usize = seasons.iter().map(|s| s.matches.len()).sum();
        tracing::info!(
            "Extracted {} matches from {} season files",
            match_count,
            seasons.len()
        );

        // Transform
        tracing::info!("🧮 Building league tables...");
        let result = self.pipeline.transform(seasons).await?;
        tracing::info!(
            "Built {} tables with {} team rows",
            result.tables.len(),
            result.row_count()
        );

        // Load
        tracing::info!("💾 Writing outputs...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} ({:?} elapsed)",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}

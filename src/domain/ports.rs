use crate::domain::model::{ScoringRules, SeasonMatches, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn countries(&self) -> &[String];
    fn seasons(&self) -> &[String];
    /// Explicit team list; `None` means every team found in the season file.
    fn teams(&self) -> Option<&[String]>;
    fn scoring(&self) -> ScoringRules;
    fn output_formats(&self) -> &[String];
    /// Upper bound on season units aggregated at the same time.
    fn concurrency(&self) -> usize;
    /// Archive name when outputs are bundled into one ZIP file.
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SeasonMatches>>;
    async fn transform(&self, data: Vec<SeasonMatches>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

use crate::domain::model::{ClassifiedRecord, FetchedBatch, TripPair, WriteSummary};
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, used in logs and summaries.
    fn describe(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn site_url(&self) -> &str;
    fn api_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn retry_policy(&self) -> RetryPolicy;
    fn trip_pairs(&self) -> &[TripPair];
    fn departure_dates(&self) -> Vec<NaiveDate>;
    fn routes_filename(&self) -> &str;
    fn failures_filename(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<FetchedBatch>;
    async fn transform(&self, fetched: FetchedBatch) -> Result<Vec<ClassifiedRecord>>;
    async fn load(&self, records: Vec<ClassifiedRecord>) -> Result<WriteSummary>;
}

use crate::adapters::http::{
    http_client, CredentialBootstrapper, LocaleResolver, OperatorEndpoints, RouteFetcher,
};
use crate::core::classifier::classify_batch;
use crate::core::request_builder::build_batch;
use crate::core::writer::ResultWriter;
use crate::core::{ClassifiedRecord, ConfigProvider, FetchedBatch, Pipeline, Storage, WriteSummary};
use crate::utils::error::{EtlError, Result};
use crate::utils::retry::retry_with_backoff;

/// Authenticated route retrieval against the operator API:
/// bootstrap -> resolve -> build -> fetch, then classify, then write.
pub struct RoutePipeline<S: Storage, C: ConfigProvider> {
    config: C,
    endpoints: OperatorEndpoints,
    writer: ResultWriter<S>,
}

impl<S: Storage, C: ConfigProvider> RoutePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let endpoints = OperatorEndpoints::new(config.site_url(), config.api_url())?;
        let writer = ResultWriter::new(
            storage,
            config.routes_filename(),
            config.failures_filename(),
        );

        Ok(Self {
            config,
            endpoints,
            writer,
        })
    }

    pub fn endpoints(&self) -> &OperatorEndpoints {
        &self.endpoints
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RoutePipeline<S, C> {
    async fn extract(&self) -> Result<FetchedBatch> {
        let policy = self.config.retry_policy();
        let client = http_client(self.config.request_timeout())?;

        let bootstrapper = CredentialBootstrapper::new(client.clone(), self.endpoints.clone());
        let credentials =
            retry_with_backoff(&policy, "credential bootstrap", || bootstrapper.bootstrap()).await?;

        let resolver = LocaleResolver::new(client, self.endpoints.directory.clone());
        let directory = retry_with_backoff(&policy, "locale directory", || {
            resolver.resolve_directory(&credentials)
        })
        .await?;

        let trip_pairs = self.config.trip_pairs();
        let dates = self.config.departure_dates();
        let requests = build_batch(trip_pairs, &dates, &directory)?;
        tracing::info!(
            "🧾 Built {} route queries ({} trips x {} dates)",
            requests.len(),
            trip_pairs.len(),
            dates.len()
        );

        // 抓取階段使用獨立的連線，離開區塊即釋放
        let responses = {
            let fetcher =
                RouteFetcher::new(self.endpoints.routes.clone(), self.config.request_timeout())?;
            fetcher.fetch(&requests, &credentials).await
        };

        if responses.len() != requests.len() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "fetched {} responses for {} requests",
                    responses.len(),
                    requests.len()
                ),
            });
        }

        Ok(FetchedBatch {
            requests,
            responses,
        })
    }

    async fn transform(&self, fetched: FetchedBatch) -> Result<Vec<ClassifiedRecord>> {
        let records = classify_batch(fetched.responses);
        let routes = records.iter().filter(|record| record.is_route()).count();

        tracing::info!(
            "🔄 Classified {} responses: {} with routes, {} failed",
            records.len(),
            routes,
            records.len() - routes
        );
        Ok(records)
    }

    async fn load(&self, records: Vec<ClassifiedRecord>) -> Result<WriteSummary> {
        self.writer.write(records).await
    }
}

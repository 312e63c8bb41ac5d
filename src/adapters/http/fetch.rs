use crate::adapters::http::{http_client, with_credentials};
use crate::domain::model::{Credentials, RawResponse, TripRequest};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Sends route queries one at a time and never fails as a whole: every
/// request produces exactly one [`RawResponse`], in input order.
pub struct RouteFetcher {
    client: Client,
    routes_url: Url,
}

impl RouteFetcher {
    /// Opens a dedicated HTTP client for the fetch stage; it is released
    /// when the fetcher is dropped.
    pub fn new(routes_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, routes_url))
    }

    pub fn with_client(client: Client, routes_url: Url) -> Self {
        Self { client, routes_url }
    }

    pub async fn fetch(&self, batch: &[TripRequest], credentials: &Credentials) -> Vec<RawResponse> {
        let mut responses = Vec::with_capacity(batch.len());

        for (index, request) in batch.iter().enumerate() {
            let response = self.fetch_one(request, credentials).await;
            tracing::debug!(
                "📡 Route query {}/{} ({} -> {} on {}): status {}",
                index + 1,
                batch.len(),
                request.origin_id,
                request.destination_id,
                request.departure_date,
                response.status_code
            );
            responses.push(response);
        }

        responses
    }

    async fn fetch_one(&self, request: &TripRequest, credentials: &Credentials) -> RawResponse {
        let builder = with_credentials(self.client.post(self.routes_url.clone()), credentials)
            .json(&request.query());

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    "📡 Route query {} -> {} on {} failed in transport: {}",
                    request.origin_id,
                    request.destination_id,
                    request.departure_date,
                    e
                );
                return RawResponse::transport_failure(e.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => RawResponse::new(status, body),
            Err(e) => RawResponse::new(status, format!("failed to read response body: {}", e)),
        }
    }
}

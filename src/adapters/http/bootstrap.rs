use crate::adapters::http::endpoints::OperatorEndpoints;
use crate::domain::model::Credentials;
use crate::utils::error::{AuthErrorKind, EtlError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde_json::{json, Value};

const CLIENT_ID_SELECTOR: &str = "#clientId";

/// Obtains API credentials the same way the operator's own site does:
/// scrape the client id from the landing page, ask the site for an
/// authorization id, then trade both for an access token.
///
/// Nothing here retries. Transport errors come back as [`EtlError::Http`]
/// and the caller decides whether to try again.
pub struct CredentialBootstrapper {
    client: Client,
    endpoints: OperatorEndpoints,
}

impl CredentialBootstrapper {
    pub fn new(client: Client, endpoints: OperatorEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub async fn bootstrap(&self) -> Result<Credentials> {
        let client_id = self.discover_client_id().await?;
        tracing::debug!("🔐 Discovered client id from {}", self.endpoints.landing_page);

        let authorization_id = self.request_authorization_id().await?;
        tracing::debug!("🔐 Obtained authorization id");

        let access_token = self.exchange_token(&client_id, &authorization_id).await?;
        tracing::info!("🔐 Access token obtained");

        Ok(Credentials::new(client_id, access_token))
    }

    async fn discover_client_id(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoints.landing_page.clone())
            .send()
            .await?;
        tracing::debug!("🔐 Landing page status: {}", response.status());

        let html = response.text().await?;
        extract_client_id(&html)
    }

    async fn request_authorization_id(&self) -> Result<String> {
        let url = &self.endpoints.authorization;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(EtlError::auth(
                AuthErrorKind::AuthEndpointUnreachable,
                format!("{} answered {}: {}", url, status, body),
            ));
        }

        let malformed = |reason: &str| {
            EtlError::auth(
                AuthErrorKind::AuthEndpointMalformed,
                format!("{} {}: {}", url, reason, body),
            )
        };

        let json: Value =
            serde_json::from_str(&body).map_err(|_| malformed("returned a non-JSON body"))?;

        if json.get("isSuccess").and_then(Value::as_bool) != Some(true) {
            return Err(malformed("did not report isSuccess"));
        }

        json.get("result")
            .and_then(|result| result.get("authorizationId"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| malformed("returned no result.authorizationId"))
    }

    async fn exchange_token(&self, client_id: &str, authorization_id: &str) -> Result<String> {
        let url = &self.endpoints.login;
        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, authorization_id)
            .header("client_id", client_id)
            .json(&json!({ "grant_type": "client_credentials" }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| {
                json.get("access_token")
                    .and_then(Value::as_str)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| {
                EtlError::auth(
                    AuthErrorKind::TokenExchangeFailed,
                    format!("{} answered {} without an access_token: {}", url, status, body),
                )
            })
    }
}

/// Finds the page-embedded client id element and reads its `value`.
pub fn extract_client_id(html: &str) -> Result<String> {
    let selector = Selector::parse(CLIENT_ID_SELECTOR).map_err(|e| EtlError::ProcessingError {
        message: format!("invalid selector {}: {}", CLIENT_ID_SELECTOR, e),
    })?;
    let document = Html::parse_document(html);

    let element = document.select(&selector).next().ok_or_else(|| {
        EtlError::auth(
            AuthErrorKind::ClientIdMissing,
            "landing page has no clientId element",
        )
    })?;

    element
        .value()
        .attr("value")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            EtlError::auth(
                AuthErrorKind::ClientIdMalformed,
                "clientId element carries no value attribute",
            )
        })
}

//! Clients for the bus operator's public site and JSON API.

pub mod bootstrap;
pub mod endpoints;
pub mod fetch;
pub mod locale;

pub use bootstrap::CredentialBootstrapper;
pub use endpoints::OperatorEndpoints;
pub use fetch::RouteFetcher;
pub use locale::LocaleResolver;

use crate::domain::model::Credentials;
use crate::utils::error::Result;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Builds an HTTP client with the per-request timeout applied.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// The API authenticates every call through these two headers.
pub(crate) fn with_credentials(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    request
        .header("Client_id", credentials.client_id())
        .header("Access_token", credentials.access_token())
}

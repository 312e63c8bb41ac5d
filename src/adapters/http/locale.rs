use crate::adapters::http::with_credentials;
use crate::domain::locale::LocaleDirectory;
use crate::domain::model::Credentials;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

/// Fetches the operator's place directory. Lookups happen on the returned
/// [`LocaleDirectory`], which is never re-fetched during a run.
pub struct LocaleResolver {
    client: Client,
    directory_url: Url,
}

impl LocaleResolver {
    pub fn new(client: Client, directory_url: Url) -> Self {
        Self {
            client,
            directory_url,
        }
    }

    pub async fn resolve_directory(&self, credentials: &Credentials) -> Result<LocaleDirectory> {
        let request = self.client.get(self.directory_url.clone());
        let response = with_credentials(request, credentials).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(EtlError::Directory {
                message: format!("{} answered {}: {}", self.directory_url, status, body),
            });
        }

        let entries = parse_directory(&body).ok_or_else(|| EtlError::Directory {
            message: format!(
                "{} returned no successful result list: {}",
                self.directory_url, body
            ),
        })?;

        tracing::info!("🗺️ Loaded {} locales from the operator directory", entries.len());
        Ok(LocaleDirectory::from_entries(entries))
    }
}

fn parse_directory(body: &str) -> Option<Vec<Value>> {
    let json: Value = serde_json::from_str(body).ok()?;
    if json.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    json.get("result")?.as_array().cloned()
}

use crate::domain::model::{ClassifiedRecord, FailureRecord, RouteRecord, WriteSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Debug;

pub const DEFAULT_ROUTES_FILENAME: &str = "result_api.json";
pub const DEFAULT_FAILURES_FILENAME: &str = "result_api_invalid.json";

/// Persists classified records as two JSON documents, one per kind.
pub struct ResultWriter<S: Storage> {
    storage: S,
    routes_filename: String,
    failures_filename: String,
}

impl<S: Storage> ResultWriter<S> {
    pub fn new(
        storage: S,
        routes_filename: impl Into<String>,
        failures_filename: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            routes_filename: routes_filename.into(),
            failures_filename: failures_filename.into(),
        }
    }

    /// Both files are always attempted. If storage fails for either, the
    /// first storage error is returned once both attempts are done.
    pub async fn write(&self, records: Vec<ClassifiedRecord>) -> Result<WriteSummary> {
        let (routes, failures) = partition(records);

        let routes_written = self.write_sink(&self.routes_filename, &routes).await;
        let failures_written = self.write_sink(&self.failures_filename, &failures).await;
        routes_written?;
        failures_written?;

        Ok(WriteSummary {
            routes_path: self.storage.describe(&self.routes_filename),
            failures_path: self.storage.describe(&self.failures_filename),
            route_count: routes.len(),
            failure_count: failures.len(),
        })
    }

    async fn write_sink<T: Serialize + Debug + Sync>(&self, filename: &str, items: &[T]) -> Result<()> {
        let data = serialize_or_debug(filename, items);
        let result = self.storage.write_file(filename, &data).await;

        match &result {
            Ok(()) => tracing::info!(
                "💾 Wrote {} records to {}",
                items.len(),
                self.storage.describe(filename)
            ),
            Err(e) => tracing::error!(
                "❌ Could not write {}: {}",
                self.storage.describe(filename),
                e
            ),
        }

        result
    }
}

/// Splits records by kind, keeping batch order within each side.
pub fn partition(records: Vec<ClassifiedRecord>) -> (Vec<RouteRecord>, Vec<FailureRecord>) {
    let mut routes = Vec::new();
    let mut failures = Vec::new();

    for record in records {
        match record {
            ClassifiedRecord::Route(route) => routes.push(route),
            ClassifiedRecord::Failure(failure) => failures.push(failure),
        }
    }

    (routes, failures)
}

/// JSON when possible; otherwise the `Debug` rendering of the same records,
/// so a bad record costs format fidelity rather than the whole file.
pub fn serialize_or_debug<T: Serialize + Debug>(label: &str, items: &[T]) -> Vec<u8> {
    match serde_json::to_vec_pretty(items) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("⚠️ Could not serialize {} as JSON, writing raw text: {}", label, e);
            format!("{:?}", items).into_bytes()
        }
    }
}

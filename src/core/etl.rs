use crate::core::{Pipeline, WriteSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<WriteSummary> {
        tracing::info!("🚀 Starting route collection");

        // Extract
        let fetched = self.pipeline.extract().await?;
        tracing::info!("📥 Fetched {} responses", fetched.responses.len());
        self.monitor.log_stats("Extract");

        // Transform
        let records = self.pipeline.transform(fetched).await?;
        self.monitor.log_stats("Transform");

        // Load
        let summary = self.pipeline.load(records).await?;
        tracing::info!(
            "✅ Saved {} route records to {} and {} failures to {}",
            summary.route_count,
            summary.routes_path,
            summary.failure_count,
            summary.failures_path
        );
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}

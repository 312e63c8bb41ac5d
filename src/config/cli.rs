use crate::config::toml_config::TomlConfig;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "route-etl")]
#[command(about = "Collects bus route offers from the operator API into JSON files")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "route-etl.toml")]
    pub config: String,

    /// Override the output directory from config
    #[arg(long)]
    pub output_path: Option<String>,

    /// First departure date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Number of consecutive departure dates to query
    #[arg(long)]
    pub days: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,

    /// Dry run - show what would be queried without touching the network
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 應用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
            tracing::info!("🔧 Output path overridden to: {}", output_path);
        }
        if let Some(start_date) = self.start_date {
            config.extract.start_date = Some(start_date);
            tracing::info!("🔧 Start date overridden to: {}", start_date);
        }
        if let Some(days) = self.days {
            config.extract.days = Some(days);
            tracing::info!("🔧 Days overridden to: {}", days);
        }
        if let Some(monitor) = self.monitor {
            let monitoring = config.monitoring.get_or_insert(
                crate::config::toml_config::MonitoringConfig {
                    enabled: monitor,
                    log_level: None,
                },
            );
            monitoring.enabled = monitor;
        }
    }

    pub fn verbose_logging(&self, config: Option<&TomlConfig>) -> bool {
        self.verbose
            || config
                .and_then(|c| c.log_level())
                .is_some_and(|level| level.eq_ignore_ascii_case("debug"))
    }
}

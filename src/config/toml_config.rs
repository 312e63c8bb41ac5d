use crate::adapters::http::endpoints::{DEFAULT_API_URL, DEFAULT_SITE_URL};
use crate::core::request_builder::departure_window;
use crate::core::writer::{DEFAULT_FAILURES_FILENAME, DEFAULT_ROUTES_FILENAME};
use crate::core::ConfigProvider;
use crate::domain::model::TripPair;
use crate::utils::error::{EtlError, Result};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::{
    validate_base_url, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
const DEFAULT_RETRY_DELAY_SECONDS: u64 = 2;
const DEFAULT_DAYS: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub site_url: Option<String>,
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Quoted `YYYY-MM-DD`; defaults to today's UTC date.
    pub start_date: Option<NaiveDate>,
    pub days: Option<u32>,
    #[serde(default)]
    pub trips: Vec<TripPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub routes_filename: Option<String>,
    pub failures_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPERATOR_API_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ProcessingError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_base_url("source.site_url", self.site_url())?;
        validate_base_url("source.api_url", self.api_url())?;
        validate_range("source.timeout_seconds", self.timeout_seconds(), 1, 600)?;
        validate_positive_number("source.retry_attempts", self.retry_attempts(), 1)?;

        validate_range("extract.days", self.days(), 1, 366)?;
        if self.extract.trips.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "extract.trips".to_string(),
            });
        }
        for trip in &self.extract.trips {
            validate_non_empty_string("extract.trips.origin", &trip.origin)?;
            validate_non_empty_string("extract.trips.destination", &trip.destination)?;
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_non_empty_string("load.routes_filename", self.routes_filename())?;
        validate_non_empty_string("load.failures_filename", self.failures_filename())?;
        if self.routes_filename() == self.failures_filename() {
            return Err(EtlError::ConfigValidationError {
                field: "load.failures_filename".to_string(),
                message: "routes and failures must be written to different files".to_string(),
            });
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn retry_attempts(&self) -> u32 {
        self.source.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS)
    }

    pub fn days(&self) -> u32 {
        self.extract.days.unwrap_or(DEFAULT_DAYS)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.extract
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn site_url(&self) -> &str {
        self.source.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL)
    }

    fn api_url(&self) -> &str {
        self.source.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts(),
            Duration::from_secs(
                self.source
                    .retry_delay_seconds
                    .unwrap_or(DEFAULT_RETRY_DELAY_SECONDS),
            ),
        )
    }

    fn trip_pairs(&self) -> &[TripPair] {
        &self.extract.trips
    }

    fn departure_dates(&self) -> Vec<NaiveDate> {
        departure_window(self.start_date(), self.days())
    }

    fn routes_filename(&self) -> &str {
        self.load
            .routes_filename
            .as_deref()
            .unwrap_or(DEFAULT_ROUTES_FILENAME)
    }

    fn failures_filename(&self) -> &str {
        self.load
            .failures_filename
            .as_deref()
            .unwrap_or(DEFAULT_FAILURES_FILENAME)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

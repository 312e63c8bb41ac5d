use anyhow::Context;
use clap::Parser;
use route_etl::adapters::http::OperatorEndpoints;
use route_etl::config::CliArgs;
use route_etl::core::ConfigProvider;
use route_etl::utils::error::{EtlError, ErrorSeverity};
use route_etl::utils::{logger, validation::Validate};
use route_etl::{EtlEngine, LocalStorage, RoutePipeline, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let loaded = TomlConfig::from_file(&args.config);

    // 初始化日誌
    let verbose = args.verbose_logging(loaded.as_ref().ok());
    if args.log_json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting route-etl");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config).context("dry run failed")?;
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = match RoutePipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            println!("✅ Route collection completed successfully!");
            println!("📁 {} route records: {}", summary.route_count, summary.routes_path);
            println!("📁 {} failures: {}", summary.failure_count, summary.failures_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Route collection failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &TomlConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0.0.0")
    );
    println!("  Site: {}", config.site_url());
    println!("  API: {}", config.api_url());
    println!("  Output: {}", config.output_path());
    println!(
        "  Files: {}, {}",
        config.routes_filename(),
        config.failures_filename()
    );
    println!("  Trips: {}", config.trip_pairs().len());
    println!(
        "  Dates: {} starting {}",
        config.days(),
        config.start_date()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> route_etl::Result<()> {
    let endpoints = OperatorEndpoints::new(config.site_url(), config.api_url())?;

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📡 Operator Endpoints:");
    println!("  Landing page:  {}", endpoints.landing_page);
    println!("  Authorization: {}", endpoints.authorization);
    println!("  Login:         {}", endpoints.login);
    println!("  Directory:     {}", endpoints.directory);
    println!("  Routes:        {}", endpoints.routes);

    println!();
    println!("🚌 Trips:");
    for trip in config.trip_pairs() {
        println!("  {} -> {}", trip.origin, trip.destination);
    }

    let dates = config.departure_dates();
    println!();
    println!("📅 Departure dates:");
    for date in &dates {
        println!("  {}", date);
    }

    println!();
    println!(
        "📊 Expected route queries: {}",
        config.trip_pairs().len() * dates.len()
    );

    Ok(())
}

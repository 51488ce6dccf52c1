use clap::Parser;
use league_etl::core::loader::league_code;
use league_etl::core::{ConfigProvider, Pipeline, SeasonUnit};
use league_etl::utils::{logger, validation::Validate};
use league_etl::{EtlEngine, LeaguePipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Build league tables from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "league-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.log_level() == Some("debug");
    logger::init_logger(verbose, config.json_logs());

    tracing::info!("🚀 Starting TOML-based league ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output_path) = &args.output_path {
        config.load.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let source = LocalStorage::new(config.raw_data_dir().to_string());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = LeaguePipeline::new(source, sink, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        let units = pipeline.units()?;
        let readable = match pipeline.extract().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("⚠️ {}", e);
                false
            }
        };
        perform_dry_run(&units, readable);
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ League tables built successfully!");
            println!("✅ League tables built successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    println!("  Raw data: {}", config.raw_data_dir());
    println!("  Countries: {}", config.countries().join(", "));
    println!("  Seasons: {}", config.seasons().join(", "));
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    let rules = config.scoring();
    println!(
        "  Scoring: win={} draw={} loss={}",
        rules.win, rules.draw, rules.loss
    );
    match config.teams() {
        Some(teams) => println!("  Teams: {}", teams.join(", ")),
        None => println!("  Teams: all teams found in each season"),
    }
    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }
    println!();
}

fn perform_dry_run(units: &[SeasonUnit], all_sources_readable: bool) {
    println!("🔍 Dry Run Analysis:");
    for unit in units {
        println!(
            "  {} [{}] {} <- {}",
            unit.country,
            league_code(&unit.country).unwrap_or("?"),
            unit.season,
            unit.raw_data_path()
        );
    }
    println!();
    if all_sources_readable {
        println!("✅ Every season file loads cleanly.");
    } else {
        println!("⚠️ Some season files are missing or malformed; run with --verbose for details.");
    }
}

use clap::Parser;
use league_etl::utils::{logger, validation::Validate};
use league_etl::{CliConfig, EtlEngine, LeaguePipeline, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting league-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 原始資料與輸出各用一個存儲
    let source = LocalStorage::new(config.raw_data_dir.clone());
    let sink = LocalStorage::new(config.output_path.clone());
    let pipeline = LeaguePipeline::new(source, sink, config);

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ League tables built successfully!");
            println!("✅ League tables built successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?}, Retryable: {})",
                e,
                e.category(),
                e.severity(),
                e.is_retryable()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let code = e.severity().exit_code();
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

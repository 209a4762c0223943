use clap::Parser;
use weight_check::app;
use weight_check::utils::{logger, validation::Validate};
use weight_check::{CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting weight-check");

    if let Some(path) = config.config.clone() {
        match TomlConfig::from_file(&path) {
            Ok(file_config) => config = config.with_file_defaults(&file_config),
            Err(e) => {
                tracing::error!("❌ Failed to load config file {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    }
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match app::run(&config).await {
        Ok(summary) => {
            tracing::info!(
                "✅ {} of {} products exceed their allowance",
                summary.flagged,
                summary.products
            );
            if let Some(output) = summary.output {
                tracing::info!("📁 Results saved to: {}", output);
            }
        }
        Err(e) => {
            tracing::error!("❌ Calculation failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = if e.is_config_error() { 1 } else { 2 };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

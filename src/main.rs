use clap::Parser;
use zefix_enrich::config::Command;
use zefix_enrich::utils::{logger, validation::Validate};
use zefix_enrich::{export_by_name_and_legal_seat, export_by_uid, CliConfig, EnrichError};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Enrichment failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &CliConfig) -> Result<(), EnrichError> {
    cli.validate()?;
    let config = cli.resolve()?;

    let summary = match &cli.command {
        Command::NameAndSeat { input, output } => {
            export_by_name_and_legal_seat(input, output, &config).await?
        }
        Command::Uid { input, output } => export_by_uid(input, output, &config).await?,
    };

    tracing::info!(
        "📊 {} input rows, {} output rows ({} matched, {} without match, {} failed)",
        summary.stats.input_rows,
        summary.stats.output_rows,
        summary.stats.matched,
        summary.stats.unmatched,
        summary.stats.failed
    );
    Ok(())
}

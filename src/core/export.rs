use crate::adapters::{LocalStorage, ZefixClient};
use crate::config::toml_config::EnrichConfig;
use crate::core::etl::{EnrichmentEngine, RunSummary};
use crate::core::lookup_mode::LookupMode;
use crate::core::pipeline::{EnrichmentPipeline, ExportJob};
use crate::core::LookupClient;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use std::sync::Arc;

/// Enriches `input_path` by company name and legal seat, writing `output_path`.
pub async fn export_by_name_and_legal_seat(
    input_path: &str,
    output_path: &str,
    config: &EnrichConfig,
) -> Result<RunSummary> {
    export_with_registry(LookupMode::NameAndLegalSeat, input_path, output_path, config).await
}

/// Enriches `input_path` by company UID, writing `output_path`.
pub async fn export_by_uid(
    input_path: &str,
    output_path: &str,
    config: &EnrichConfig,
) -> Result<RunSummary> {
    export_with_registry(LookupMode::Uid, input_path, output_path, config).await
}

async fn export_with_registry(
    mode: LookupMode,
    input_path: &str,
    output_path: &str,
    config: &EnrichConfig,
) -> Result<RunSummary> {
    config.validate()?;
    let client = ZefixClient::new(&config.api)?;
    export(mode, input_path, output_path, config, Arc::new(client)).await
}

/// Runs one export with the given lookup client and prints where the result went.
pub async fn export(
    mode: LookupMode,
    input_path: &str,
    output_path: &str,
    config: &EnrichConfig,
    client: Arc<dyn LookupClient>,
) -> Result<RunSummary> {
    config.validate()?;
    validate_path("input", input_path)?;
    validate_path("output", output_path)?;

    let job = ExportJob::new(mode, input_path, output_path);
    let pipeline = EnrichmentPipeline::new(LocalStorage::default(), config.clone(), client, job);
    let summary = EnrichmentEngine::new(pipeline).run().await?;

    println!("Updated data saved to {}.", summary.output_path);
    Ok(summary)
}

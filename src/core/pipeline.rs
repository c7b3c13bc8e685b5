use crate::core::lookup_mode::LookupMode;
use crate::core::normalizer::RowNormalizer;
use crate::core::table::{decode_table, encode_table};
use crate::core::{ConfigProvider, InputRow, LookupClient, OutputTable, Pipeline, Storage};
use crate::domain::model::{OutputRow, RowOutcome};
use crate::utils::error::{EnrichError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// What to enrich and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub mode: LookupMode,
    pub input_path: String,
    pub output_path: String,
}

impl ExportJob {
    pub fn new(mode: LookupMode, input_path: &str, output_path: &str) -> Self {
        Self {
            mode,
            input_path: input_path.to_string(),
            output_path: output_path.to_string(),
        }
    }
}

/// Reads a table, looks every row up concurrently and writes the merged table.
pub struct EnrichmentPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Arc<dyn LookupClient>,
    normalizer: Arc<RowNormalizer>,
    job: ExportJob,
}

impl<S: Storage, C: ConfigProvider> EnrichmentPipeline<S, C> {
    pub fn new(storage: S, config: C, client: Arc<dyn LookupClient>, job: ExportJob) -> Self {
        let normalizer = Arc::new(RowNormalizer::new(config.field_mapping().clone()));
        Self {
            storage,
            config,
            client,
            normalizer,
            job,
        }
    }

    pub fn job(&self) -> &ExportJob {
        &self.job
    }

    fn schema_for(&self, rows: &[InputRow]) -> Vec<String> {
        match rows.first() {
            Some(row) => self.normalizer.schema(row.columns()),
            // nothing was read, so fall back to the columns the lookup mode needs
            None => self
                .normalizer
                .schema(self.job.mode.key_columns().iter().copied()),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EnrichmentPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InputRow>> {
        tracing::info!("📂 Reading input table: {}", self.job.input_path);
        let bytes = self.storage.read_file(&self.job.input_path).await?;
        let rows = decode_table(
            &bytes,
            self.config.input_delimiter(),
            self.config.input_encoding(),
        )?;
        tracing::info!("📊 Read {} rows", rows.len());
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<InputRow>) -> Result<OutputTable> {
        let workers = self.config.workers().max(1);
        let schema = Arc::new(self.schema_for(&rows));
        let semaphore = Arc::new(Semaphore::new(workers));

        tracing::info!(
            "🔎 Looking up {} rows by {} with {} workers",
            rows.len(),
            self.job.mode,
            workers
        );

        let mut tasks: JoinSet<Result<(RowOutcome, Vec<OutputRow>)>> = JoinSet::new();
        for row in rows {
            let query = self.job.mode.build_query(&row);
            let client = Arc::clone(&self.client);
            let normalizer = Arc::clone(&self.normalizer);
            let schema = Arc::clone(&schema);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| EnrichError::ProcessingError {
                        message: format!("Failed to acquire worker slot: {}", e),
                    })?;

                tracing::debug!("Row {}: lookup {:?}", row.index, query);
                let result = client.lookup(&query).await;
                let outcome = RowOutcome::of(&result);
                if outcome == RowOutcome::Failed {
                    tracing::warn!("Row {}: lookup failed, keeping the row unenriched", row.index);
                }

                Ok::<_, EnrichError>((outcome, normalizer.normalize(&schema, &row, &result)))
            });
        }

        // single aggregation point, blocks arrive in completion order
        let mut table = OutputTable {
            columns: schema.as_ref().clone(),
            ..OutputTable::default()
        };
        while let Some(joined) = tasks.join_next().await {
            let (outcome, produced) = joined.map_err(|e| EnrichError::ProcessingError {
                message: format!("Lookup task did not complete: {}", e),
            })??;
            table.stats.record(outcome, produced.len());
            table.rows.extend(produced);
        }
        table.reindex();

        let stats = table.stats;
        tracing::info!(
            "✅ Enriched {} rows into {} (matched: {}, no match: {}, failed: {})",
            stats.input_rows,
            stats.output_rows,
            stats.matched,
            stats.unmatched,
            stats.failed
        );
        Ok(table)
    }

    async fn load(&self, table: OutputTable) -> Result<String> {
        let data = encode_table(&table, self.config.output_delimiter())?;
        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            table.len(),
            data.len(),
            self.job.output_path
        );
        self.storage
            .write_file(&self.job.output_path, &data)
            .await?;
        Ok(self.job.output_path.clone())
    }
}

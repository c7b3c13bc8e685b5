use crate::domain::model::{FieldMapping, InputRow, LookupQuery, LookupResult, OutputTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Registry lookup. Implementations never fail: transport errors and non-2xx
/// responses come back as [`LookupResult::failed`].
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(&self, query: &LookupQuery) -> LookupResult;
}

pub trait ConfigProvider: Send + Sync {
    fn input_delimiter(&self) -> u8;
    fn input_encoding(&self) -> &str;
    fn output_delimiter(&self) -> u8;
    fn workers(&self) -> usize;
    fn field_mapping(&self) -> &FieldMapping;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRow>>;
    async fn transform(&self, rows: Vec<InputRow>) -> Result<OutputTable>;
    async fn load(&self, table: OutputTable) -> Result<String>;
}

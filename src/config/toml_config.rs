use crate::core::ConfigProvider;
use crate::domain::model::FieldMapping;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_encoding, validate_positive_number, validate_range,
    validate_unique_columns, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://www.zefix.admin.ch/ZefixPublicREST/api/v1/company/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub api: ApiConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
    pub mapping: FieldMapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub username: Option<String>,
    pub password: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 30,
            username: None,
            password: None,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: char,
    pub encoding: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            encoding: "ISO-8859-1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Concurrent lookups; the host's available parallelism when unset.
    pub workers: Option<usize>,
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

impl EnrichConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ZEFIX_PASSWORD})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrichError::ConfigParseError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.endpoint", &self.api.endpoint)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validate_delimiter("input.delimiter", self.input.delimiter)?;
        validate_delimiter("output.delimiter", self.output.delimiter)?;
        validate_encoding(&self.input.encoding)?;

        if let Some(workers) = self.pipeline.workers {
            validate_positive_number("pipeline.workers", workers, 1)?;
        }

        if self.mapping.entries().is_empty() {
            return Err(EnrichError::InvalidConfigValueError {
                field: "mapping".to_string(),
                value: String::new(),
                reason: "At least one mapping entry is required".to_string(),
            });
        }
        if let Some(entry) = self
            .mapping
            .entries()
            .iter()
            .find(|entry| entry.source.trim().is_empty())
        {
            return Err(EnrichError::InvalidConfigValueError {
                field: "mapping.source".to_string(),
                value: entry.column.clone(),
                reason: "Source field cannot be empty".to_string(),
            });
        }
        validate_unique_columns("mapping.column", self.mapping.columns())?;

        Ok(())
    }
}

impl ConfigProvider for EnrichConfig {
    fn input_delimiter(&self) -> u8 {
        self.input.delimiter as u8
    }

    fn input_encoding(&self) -> &str {
        &self.input.encoding
    }

    fn output_delimiter(&self) -> u8 {
        self.output.delimiter as u8
    }

    fn workers(&self) -> usize {
        self.pipeline.workers.unwrap_or_else(default_workers)
    }

    fn field_mapping(&self) -> &FieldMapping {
        &self.mapping
    }
}

impl Validate for EnrichConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

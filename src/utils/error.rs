use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot read input '{path}': {source}")]
    InputReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown text encoding: {label}")]
    UnknownEncodingError { label: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Output,
    Config,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_) => ErrorCategory::Network,
            EnrichError::CsvError(_)
            | EnrichError::InputReadError { .. }
            | EnrichError::UnknownEncodingError { .. } => ErrorCategory::Input,
            EnrichError::IoError(_) | EnrichError::SerializationError(_) => ErrorCategory::Output,
            EnrichError::ConfigParseError { .. } | EnrichError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            EnrichError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Output | ErrorCategory::Config => {
                ErrorSeverity::High
            }
            ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run aborted by this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 2,
            ErrorCategory::Processing => 3,
            ErrorCategory::Network | ErrorCategory::Input | ErrorCategory::Output => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::ApiError(e) => format!("Could not reach the registry API: {}", e),
            EnrichError::CsvError(e) => format!("The table could not be parsed: {}", e),
            EnrichError::IoError(e) => format!("File access failed: {}", e),
            EnrichError::InputReadError { path, source } => {
                format!("The input file '{}' could not be read: {}", path, source)
            }
            EnrichError::SerializationError(e) => format!("Malformed JSON data: {}", e),
            EnrichError::ConfigParseError { message } => {
                format!("The configuration file is invalid: {}", message)
            }
            EnrichError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Setting '{}' has an invalid value '{}': {}", field, value, reason),
            EnrichError::UnknownEncodingError { label } => {
                format!("The input encoding '{}' is not supported", label)
            }
            EnrichError::ProcessingError { message } => {
                format!("Enrichment aborted: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API endpoint and your network connection",
            ErrorCategory::Input => {
                "Check that the input file exists and that --delimiter and --encoding match it"
            }
            ErrorCategory::Output => "Check that the output directory exists and is writable",
            ErrorCategory::Config => "Review the configuration file and command line options",
            ErrorCategory::Processing => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;

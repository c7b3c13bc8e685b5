use crate::config::toml_config::EnrichConfig;
use crate::core::lookup_mode::LookupMode;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "zefix-enrich")]
#[command(about = "Enrich company tables with data from the Zefix company registry")]
pub struct CliConfig {
    /// TOML configuration file; command line options take precedence
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Registry endpoint base URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Field separator of the input table
    #[arg(long, global = true)]
    pub delimiter: Option<char>,

    /// Text encoding of the input table (e.g. ISO-8859-1, utf-8)
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Field separator of the output table
    #[arg(long, global = true)]
    pub output_delimiter: Option<char>,

    /// Concurrent lookups (defaults to available parallelism)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look companies up by their `name` and `legalSeatId` columns
    NameAndSeat { input: String, output: String },
    /// Look companies up by their `uid` column
    Uid { input: String, output: String },
}

impl Command {
    pub fn mode(&self) -> LookupMode {
        match self {
            Command::NameAndSeat { .. } => LookupMode::NameAndLegalSeat,
            Command::Uid { .. } => LookupMode::Uid,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            Command::NameAndSeat { input, .. } | Command::Uid { input, .. } => input,
        }
    }

    pub fn output(&self) -> &str {
        match self {
            Command::NameAndSeat { output, .. } | Command::Uid { output, .. } => output,
        }
    }
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies command line overrides.
    pub fn resolve(&self) -> Result<EnrichConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                EnrichConfig::from_file(path)?
            }
            None => EnrichConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(delimiter) = self.delimiter {
            config.input.delimiter = delimiter;
        }
        if let Some(encoding) = &self.encoding {
            config.input.encoding = encoding.clone();
        }
        if let Some(delimiter) = self.output_delimiter {
            config.output.delimiter = delimiter;
        }
        if let Some(workers) = self.workers {
            config.pipeline.workers = Some(workers);
        }
        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", self.command.input())?;
        validate_path("output", self.command.output())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uid_subcommand_with_overrides() {
        let cli = CliConfig::try_parse_from([
            "zefix-enrich",
            "uid",
            "companies.csv",
            "enriched.csv",
            "--delimiter",
            ",",
            "--workers",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.command.mode(), LookupMode::Uid);
        assert_eq!(cli.command.input(), "companies.csv");
        assert_eq!(cli.command.output(), "enriched.csv");
        assert!(cli.validate().is_ok());

        let config = cli.resolve().unwrap();
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.pipeline.workers, Some(2));
        assert_eq!(config.input.encoding, "ISO-8859-1");
    }

    #[test]
    fn test_parse_name_and_seat_subcommand() {
        let cli = CliConfig::try_parse_from([
            "zefix-enrich",
            "--verbose",
            "name-and-seat",
            "in.csv",
            "out.csv",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.command.mode(), LookupMode::NameAndLegalSeat);
    }

    #[test]
    fn test_invalid_override_fails_resolution() {
        let cli = CliConfig::try_parse_from([
            "zefix-enrich",
            "uid",
            "in.csv",
            "out.csv",
            "--endpoint",
            "ftp://registry.example.com",
        ])
        .unwrap();

        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_missing_paths_are_rejected_by_clap() {
        assert!(CliConfig::try_parse_from(["zefix-enrich", "uid", "in.csv"]).is_err());
    }
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, ZefixClient};
pub use config::EnrichConfig;
pub use crate::core::{
    etl::{EnrichmentEngine, RunSummary},
    export::{export, export_by_name_and_legal_seat, export_by_uid},
    lookup_mode::LookupMode,
    pipeline::{EnrichmentPipeline, ExportJob},
};
pub use utils::error::{EnrichError, Result};

pub mod etl;
pub mod export;
pub mod lookup_mode;
pub mod normalizer;
pub mod pipeline;
pub mod table;

pub use crate::domain::model::{InputRow, LookupQuery, LookupResult, OutputTable};
pub use crate::domain::ports::{ConfigProvider, LookupClient, Pipeline, Storage};
pub use crate::utils::error::Result;

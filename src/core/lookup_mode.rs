use crate::domain::model::{InputRow, LookupQuery};
use std::fmt;

/// How a registry query is built from an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Search by company `name` and `legalSeatId` (BFS municipality number).
    NameAndLegalSeat,
    /// Fetch a company by its `uid`, appended to the endpoint path.
    Uid,
}

impl LookupMode {
    /// Input columns the mode reads. Missing ones are read as empty strings.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            LookupMode::NameAndLegalSeat => &["name", "legalSeatId"],
            LookupMode::Uid => &["uid"],
        }
    }

    pub fn build_query(&self, row: &InputRow) -> LookupQuery {
        let mut query = LookupQuery::default();
        query
            .params
            .insert("activeOnly".to_string(), "true".to_string());

        match self {
            LookupMode::NameAndLegalSeat => {
                query
                    .params
                    .insert("name".to_string(), row.get("name").to_string());
                query
                    .params
                    .insert("legalSeatId".to_string(), row.get("legalSeatId").to_string());
            }
            LookupMode::Uid => {
                query.path_segment = Some(row.get("uid").to_string());
            }
        }

        query
    }
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::NameAndLegalSeat => write!(f, "name-and-seat"),
            LookupMode::Uid => write!(f, "uid"),
        }
    }
}

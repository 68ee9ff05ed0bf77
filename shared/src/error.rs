use std::path::PathBuf;

use thiserror::Error;

use crate::record::Year;

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("data source {} is unavailable: {source}", .path.display())]
    DataSourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data: {0}")]
    DataFormat(String),
    /// Tally and country set were derived from different tables.
    #[error("country {0:?} is missing from the country set")]
    UnknownCountry(String),
    #[error("no tournament recorded for year {0}")]
    YearNotFound(Year),
}

impl DashboardError {
    pub fn is_year_not_found(&self) -> bool {
        matches!(self, Self::YearNotFound(_))
    }
}

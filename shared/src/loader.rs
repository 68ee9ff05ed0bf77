//! CSV source → [`Table`].
//!
//! The source needs a header row with at least `Year`, `Winners` and
//! `Runners_Up`. Other columns are ignored and column order is free.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::record::{Record, Table, Year};

pub const YEAR_COLUMN: &str = "Year";
pub const WINNER_COLUMN: &str = "Winners";
pub const RUNNER_UP_COLUMN: &str = "Runners_Up";

const REQUIRED_COLUMNS: [&str; 3] = [YEAR_COLUMN, WINNER_COLUMN, RUNNER_UP_COLUMN];

/// Raw → display name rewrites for the winners column only. Runner-up values
/// are deliberately left alone.
const WINNER_CANONICAL_NAMES: &[(&str, &str)] = &[("England", "UK (England)")];

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Year")]
    year: Year,
    #[serde(rename = "Winners")]
    winner: String,
    #[serde(rename = "Runners_Up")]
    runner_up: String,
}

pub fn load(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DashboardError::DataSourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<Table> {
    read_table(reader, Path::new("<reader>"))
}

/// Exact-match winner rewrite. Partial matches stay untouched.
pub fn canonical_winner(raw: &str) -> &str {
    WINNER_CANONICAL_NAMES
        .iter()
        .find(|(from, _)| *from == raw)
        .map_or(raw, |(_, to)| *to)
}

fn read_table<R: Read>(reader: R, origin: &Path) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(e, origin))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::DataFormat(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut seen_years = HashSet::new();
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<RawRecord>() {
        let raw = row.map_err(|e| csv_error(e, origin))?;
        let record = Record {
            year: raw.year,
            winner: canonical_winner(&raw.winner).to_owned(),
            runner_up: raw.runner_up,
        };
        validate_record(&record)?;
        if !seen_years.insert(record.year) {
            return Err(DashboardError::DataFormat(format!(
                "year {} appears more than once",
                record.year
            )));
        }
        records.push(record);
    }

    Ok(Table::new(records))
}

fn validate_record(record: &Record) -> Result<()> {
    if record.winner.is_empty() || record.runner_up.is_empty() {
        return Err(DashboardError::DataFormat(format!(
            "year {} has an empty country name",
            record.year
        )));
    }
    if record.winner == record.runner_up {
        return Err(DashboardError::DataFormat(format!(
            "year {} lists {} as both winner and runner-up",
            record.year, record.winner
        )));
    }
    Ok(())
}

fn csv_error(err: csv::Error, origin: &Path) -> DashboardError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return DashboardError::DataSourceUnavailable {
                path: origin.to_path_buf(),
                source,
            };
        }
        return DashboardError::DataFormat("unreadable source".to_owned());
    }
    DashboardError::DataFormat(err.to_string())
}

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::distinct_years;
use crate::chart::ChartSpec;
use crate::error::{DashboardError, Result};
use crate::projection::project_year_map;
use crate::record::{Table, Year};

/// Selector id and property feeding the binding.
pub const YEAR_INPUT_ID: &str = "world-cup-year";
pub const YEAR_INPUT_PROPERTY: &str = "value";
/// Graph region the binding publishes into.
pub const YEAR_OUTPUT_ID: &str = "winner-and-runner-up-map";
pub const YEAR_OUTPUT_PROPERTY: &str = "figure";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingDecl {
    pub input_id: &'static str,
    pub input_property: &'static str,
    pub output_id: &'static str,
    pub output_property: &'static str,
}

pub const YEAR_BINDING: BindingDecl = BindingDecl {
    input_id: YEAR_INPUT_ID,
    input_property: YEAR_INPUT_PROPERTY,
    output_id: YEAR_OUTPUT_ID,
    output_property: YEAR_OUTPUT_PROPERTY,
};

/// Owns the year selection and the chart currently published for it.
///
/// `select` either publishes a freshly projected chart or leaves the previous
/// selection and output exactly as they were. Published charts are never
/// modified in place; each accepted selection swaps in a new `Arc`.
#[derive(Debug, Clone)]
pub struct YearBinding {
    years: Vec<Year>,
    selection: Year,
    output: Arc<ChartSpec>,
    revision: u64,
}

impl YearBinding {
    /// Starts at the earliest tournament year.
    pub fn new(table: &Table) -> Result<Self> {
        let years = distinct_years(table);
        let Some(&initial) = years.first() else {
            return Err(DashboardError::DataFormat(
                "dataset has no tournaments to select".to_owned(),
            ));
        };
        let output = Arc::new(project_year_map(table, initial)?);
        Ok(Self {
            years,
            selection: initial,
            output,
            revision: 0,
        })
    }

    pub fn select(&mut self, table: &Table, year: Year) -> Result<Arc<ChartSpec>> {
        if self.years.binary_search(&year).is_err() {
            return Err(DashboardError::YearNotFound(year));
        }
        let output = Arc::new(project_year_map(table, year)?);
        self.selection = year;
        self.output = Arc::clone(&output);
        self.revision += 1;
        Ok(output)
    }

    pub fn selection(&self) -> Year {
        self.selection
    }

    pub fn output(&self) -> Arc<ChartSpec> {
        Arc::clone(&self.output)
    }

    /// Number of accepted selections since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, sample_table};

    #[test]
    fn starts_at_earliest_year() {
        let table = Table::new(vec![
            Record::new(1938, "Italy", "Hungary"),
            Record::new(1930, "Uruguay", "Argentina"),
        ]);
        let binding = YearBinding::new(&table).expect("binding");
        assert_eq!(binding.selection(), 1930);
        assert_eq!(binding.revision(), 0);
        assert_eq!(binding.output().points[0].location, "Uruguay");
    }

    #[test]
    fn empty_table_cannot_bind() {
        let err = YearBinding::new(&Table::default()).expect_err("no years");
        assert!(matches!(err, DashboardError::DataFormat(_)));
    }

    #[test]
    fn selecting_known_year_publishes_new_output() {
        let table = sample_table();
        let mut binding = YearBinding::new(&table).expect("binding");
        let before = binding.output();

        let published = binding.select(&table, 1934).expect("known year");

        assert_eq!(binding.selection(), 1934);
        assert_eq!(binding.revision(), 1);
        assert!(Arc::ptr_eq(&published, &binding.output()));
        assert_eq!(published.points[0].location, "Italy");
        assert_eq!(published.points[1].location, "Czechoslovakia");
        assert_eq!(before.points[0].location, "Uruguay");
    }

    #[test]
    fn rejected_year_keeps_previous_output() {
        let table = sample_table();
        let mut binding = YearBinding::new(&table).expect("binding");
        binding.select(&table, 1938).expect("known year");
        let before = binding.output();

        let err = binding.select(&table, 1999).expect_err("unknown year");

        assert!(matches!(err, DashboardError::YearNotFound(1999)));
        assert_eq!(binding.selection(), 1938);
        assert_eq!(binding.revision(), 1);
        assert!(Arc::ptr_eq(&before, &binding.output()));
    }

    #[test]
    fn reselecting_same_year_still_recomputes() {
        let table = sample_table();
        let mut binding = YearBinding::new(&table).expect("binding");
        let before = binding.output();

        let after = binding.select(&table, 1930).expect("known year");

        assert_eq!(*before, *after);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(binding.revision(), 1);
    }
}

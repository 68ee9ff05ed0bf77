use serde::{Deserialize, Serialize};

pub type Year = u16;

/// One tournament outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub year: Year,
    pub winner: String,
    pub runner_up: String,
}

impl Record {
    pub fn new(year: Year, winner: impl Into<String>, runner_up: impl Into<String>) -> Self {
        Self {
            year,
            winner: winner.into(),
            runner_up: runner_up.into(),
        }
    }
}

/// Records in source order. Built once by the loader and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for `year`. Well-formed tables yield at most one.
    pub fn by_year(&self, year: Year) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |record| record.year == year)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) fn sample_table() -> Table {
    Table::new(vec![
        Record::new(1930, "Uruguay", "Argentina"),
        Record::new(1934, "Italy", "Czechoslovakia"),
        Record::new(1938, "Italy", "Hungary"),
    ])
}

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::record::{Table, Year};

/// Distinct participants, winners first, then runners-up, each in order of
/// first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountrySet {
    names: Vec<String>,
}

impl CountrySet {
    pub fn contains(&self, country: &str) -> bool {
        self.names.iter().any(|name| name == country)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinCount {
    pub country: String,
    pub wins: u32,
}

/// Win count for every participant, zero-win countries included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WinTally {
    entries: Vec<WinCount>,
}

impl WinTally {
    pub fn get(&self, country: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.country == country)
            .map(|entry| entry.wins)
    }

    pub fn entries(&self) -> &[WinCount] {
        &self.entries
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|entry| entry.wins).sum()
    }

    pub fn max_wins(&self) -> u32 {
        self.entries
            .iter()
            .map(|entry| entry.wins)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn compute_country_set(table: &Table) -> CountrySet {
    let mut unique = HashSet::new();
    let names = table
        .iter()
        .map(|record| record.winner.as_str())
        .chain(table.iter().map(|record| record.runner_up.as_str()))
        .filter(|name| unique.insert(*name))
        .map(str::to_owned)
        .collect();
    CountrySet { names }
}

/// Tallies wins per country. Every winner must already be in `countries`.
pub fn compute_win_tally(table: &Table, countries: &CountrySet) -> Result<WinTally> {
    let mut entries: Vec<WinCount> = countries
        .iter()
        .map(|country| WinCount {
            country: country.to_owned(),
            wins: 0,
        })
        .collect();
    let index: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.country.clone(), idx))
        .collect();

    for record in table {
        let Some(&idx) = index.get(&record.winner) else {
            return Err(DashboardError::UnknownCountry(record.winner.clone()));
        };
        entries[idx].wins += 1;
    }

    Ok(WinTally { entries })
}

/// Distinct tournament years, ascending.
pub fn distinct_years(table: &Table) -> Vec<Year> {
    table
        .iter()
        .map(|record| record.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Selector label for a year: plain decimal digits, no grouping.
pub fn year_label(year: Year) -> String {
    year.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMark {
    pub value: Year,
    pub label: String,
}

pub fn year_marks(years: &[Year]) -> Vec<YearMark> {
    years
        .iter()
        .map(|&year| YearMark {
            value: year,
            label: year_label(year),
        })
        .collect()
}

use std::sync::Arc;

use crate::aggregate::{CountrySet, WinTally, compute_country_set, compute_win_tally, distinct_years};
use crate::chart::ChartSpec;
use crate::error::Result;
use crate::layout::{Layout, dashboard_layout};
use crate::projection::{project_win_tally_map, project_winners_map};
use crate::record::{Table, Year};

/// Everything computed once at startup. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub table: Table,
    pub countries: CountrySet,
    pub tally: WinTally,
    pub years: Vec<Year>,
    pub winners_map: Arc<ChartSpec>,
    pub win_tally_map: Arc<ChartSpec>,
}

impl Dashboard {
    pub fn build(table: Table) -> Result<Self> {
        let countries = compute_country_set(&table);
        let tally = compute_win_tally(&table, &countries)?;
        let years = distinct_years(&table);
        let winners_map = Arc::new(project_winners_map(&table));
        let win_tally_map = Arc::new(project_win_tally_map(&tally));
        Ok(Self {
            table,
            countries,
            tally,
            years,
            winners_map,
            win_tally_map,
        })
    }

    pub fn first_year(&self) -> Option<Year> {
        self.years.first().copied()
    }

    pub fn layout(&self, selected_year: Year) -> Layout {
        dashboard_layout(&self.years, selected_year)
    }
}

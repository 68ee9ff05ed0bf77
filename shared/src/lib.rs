pub mod aggregate;
pub mod binding;
pub mod chart;
pub mod colors;
pub mod dashboard;
pub mod error;
pub mod layout;
pub mod loader;
pub mod projection;
pub mod record;

pub use aggregate::{
    CountrySet, WinCount, WinTally, YearMark, compute_country_set, compute_win_tally,
    distinct_years, year_label, year_marks,
};
pub use binding::{YEAR_BINDING, YearBinding};
pub use chart::{CategoryColor, ChartPoint, ChartSpec, ColorMapping, ColorValue, LocationMode};
pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
pub use layout::{Component, Layout, dashboard_layout};
pub use loader::{load, load_from_reader};
pub use projection::{ResultRole, project_win_tally_map, project_winners_map, project_year_map};
pub use record::{Record, Table, Year};

//! Pure projections from the dataset to the three dashboard maps.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::WinTally;
use crate::chart::{CategoryColor, ChartPoint, ChartSpec, ColorMapping, ColorValue, LocationMode};
use crate::colors::{RUNNER_UP_COLOR, WINNER_COLOR, continuous_scale, country_color, to_hex};
use crate::error::{DashboardError, Result};
use crate::record::{Table, Year};

pub const WINNERS_MAP_TITLE: &str = "Countries that have Won a World Cup";
pub const WIN_TALLY_MAP_TITLE: &str = "Number of World Cup Wins by Country";
pub const WIN_TALLY_COLOR_TITLE: &str = "Wins";
pub const YEAR_MAP_COLOR_TITLE: &str = "Result";

const WIN_TALLY_SCALE_STOPS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultRole {
    #[serde(rename = "Winner")]
    Winner,
    #[serde(rename = "Runner-Up")]
    RunnerUp,
}

impl ResultRole {
    pub const ALL: [ResultRole; 2] = [ResultRole::Winner, ResultRole::RunnerUp];

    pub fn label(self) -> &'static str {
        match self {
            Self::Winner => "Winner",
            Self::RunnerUp => "Runner-Up",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Winner => WINNER_COLOR,
            Self::RunnerUp => RUNNER_UP_COLOR,
        }
    }
}

/// One entry per winning appearance; repeat champions contribute repeated,
/// identically colored entries.
pub fn project_winners_map(table: &Table) -> ChartSpec {
    let points = table
        .iter()
        .map(|record| ChartPoint {
            location: record.winner.clone(),
            color: ColorValue::Category(record.winner.clone()),
            hover: record.winner.clone(),
        })
        .collect();

    let mut unique = HashSet::new();
    let colors = table
        .iter()
        .map(|record| record.winner.as_str())
        .filter(|winner| unique.insert(*winner))
        .map(|winner| CategoryColor {
            category: winner.to_owned(),
            color: to_hex(country_color(winner)),
        })
        .collect();

    ChartSpec {
        title: Some(WINNERS_MAP_TITLE.to_owned()),
        location_mode: LocationMode::CountryNames,
        points,
        color_mapping: ColorMapping::Discrete { colors },
        color_title: None,
    }
}

pub fn project_win_tally_map(tally: &WinTally) -> ChartSpec {
    let points = tally
        .entries()
        .iter()
        .map(|entry| ChartPoint {
            location: entry.country.clone(),
            color: ColorValue::Number(f64::from(entry.wins)),
            hover: entry.country.clone(),
        })
        .collect();

    ChartSpec {
        title: Some(WIN_TALLY_MAP_TITLE.to_owned()),
        location_mode: LocationMode::CountryNames,
        points,
        color_mapping: ColorMapping::Continuous {
            min: 0.0,
            max: f64::from(tally.max_wins()),
            stops: continuous_scale(WIN_TALLY_SCALE_STOPS),
        },
        color_title: Some(WIN_TALLY_COLOR_TITLE.to_owned()),
    }
}

pub fn year_map_title(year: Year) -> String {
    format!("World Cup Winner and Runner-Up for {year}")
}

/// Winner and runner-up of the single tournament held in `year`.
pub fn project_year_map(table: &Table, year: Year) -> Result<ChartSpec> {
    let mut matches = table.by_year(year);
    let (Some(record), None) = (matches.next(), matches.next()) else {
        return Err(DashboardError::YearNotFound(year));
    };

    let points = ResultRole::ALL
        .into_iter()
        .map(|role| {
            let country = match role {
                ResultRole::Winner => &record.winner,
                ResultRole::RunnerUp => &record.runner_up,
            };
            ChartPoint {
                location: country.clone(),
                color: ColorValue::Category(role.label().to_owned()),
                hover: country.clone(),
            }
        })
        .collect();

    let colors = ResultRole::ALL
        .into_iter()
        .map(|role| CategoryColor {
            category: role.label().to_owned(),
            color: role.color().to_owned(),
        })
        .collect();

    Ok(ChartSpec {
        title: Some(year_map_title(year)),
        location_mode: LocationMode::CountryNames,
        points,
        color_mapping: ColorMapping::Discrete { colors },
        color_title: Some(YEAR_MAP_COLOR_TITLE.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{compute_country_set, compute_win_tally, distinct_years};
    use crate::record::{Record, sample_table};

    fn rows(spec: &ChartSpec) -> Vec<(&str, &str)> {
        spec.points
            .iter()
            .map(|point| {
                (
                    point.color.as_category().expect("categorical point"),
                    point.location.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn winners_map_has_one_point_per_record() {
        let spec = project_winners_map(&sample_table());
        let locations: Vec<&str> = spec.locations().collect();
        assert_eq!(locations, vec!["Uruguay", "Italy", "Italy"]);
        for point in &spec.points {
            assert_eq!(point.color.as_category(), Some(point.location.as_str()));
            assert_eq!(point.hover, point.location);
        }
    }

    #[test]
    fn winners_map_colors_each_champion_once() {
        let spec = project_winners_map(&sample_table());
        let ColorMapping::Discrete { colors } = &spec.color_mapping else {
            panic!("winners map should use a discrete mapping");
        };
        let categories: Vec<&str> = colors.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Uruguay", "Italy"]);
        assert_eq!(
            spec.color_mapping.color_for("Italy"),
            Some(to_hex(country_color("Italy")).as_str())
        );
    }

    #[test]
    fn win_tally_map_includes_zero_win_countries() {
        let table = sample_table();
        let tally = compute_win_tally(&table, &compute_country_set(&table)).expect("tally");
        let spec = project_win_tally_map(&tally);

        assert_eq!(spec.points.len(), 5);
        let hungary = spec
            .points
            .iter()
            .find(|point| point.location == "Hungary")
            .expect("zero-win country present");
        assert_eq!(hungary.color.as_number(), Some(0.0));
        match &spec.color_mapping {
            ColorMapping::Continuous { min, max, .. } => {
                assert_eq!(*min, 0.0);
                assert_eq!(*max, 2.0);
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert_eq!(spec.color_title.as_deref(), Some(WIN_TALLY_COLOR_TITLE));
    }

    #[test]
    fn win_tally_map_is_idempotent() {
        let table = sample_table();
        let tally = compute_win_tally(&table, &compute_country_set(&table)).expect("tally");
        assert_eq!(project_win_tally_map(&tally), project_win_tally_map(&tally));
    }

    #[test]
    fn year_map_has_winner_and_runner_up_rows() {
        let spec = project_year_map(&sample_table(), 1934).expect("known year");
        assert_eq!(
            rows(&spec),
            vec![("Winner", "Italy"), ("Runner-Up", "Czechoslovakia")]
        );
        assert_eq!(
            spec.title.as_deref(),
            Some("World Cup Winner and Runner-Up for 1934")
        );
        assert_eq!(spec.color_mapping.color_for("Winner"), Some("blue"));
        assert_eq!(spec.color_mapping.color_for("Runner-Up"), Some("yellow"));
    }

    #[test]
    fn year_map_matches_record_for_every_known_year() {
        let table = sample_table();
        for year in distinct_years(&table) {
            let spec = project_year_map(&table, year).expect("known year");
            let record = table.by_year(year).next().expect("record for year");
            assert_eq!(
                rows(&spec),
                vec![
                    ("Winner", record.winner.as_str()),
                    ("Runner-Up", record.runner_up.as_str())
                ]
            );
        }
    }

    #[test]
    fn year_map_rejects_unknown_year() {
        let err = project_year_map(&sample_table(), 1999).expect_err("unknown year");
        assert!(matches!(err, DashboardError::YearNotFound(1999)));
    }

    #[test]
    fn year_map_rejects_ambiguous_year() {
        let table = Table::new(vec![
            Record::new(1930, "Uruguay", "Argentina"),
            Record::new(1930, "Italy", "Hungary"),
        ]);
        let err = project_year_map(&table, 1930).expect_err("duplicate year");
        assert!(err.is_year_not_found());
    }

    #[test]
    fn result_roles_serialize_as_display_labels() {
        let json = serde_json::to_string(&ResultRole::ALL).expect("serialize roles");
        assert_eq!(json, r#"["Winner","Runner-Up"]"#);
    }
}

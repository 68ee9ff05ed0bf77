use serde::Serialize;

use crate::aggregate::{YearMark, year_marks};
use crate::binding::{BindingDecl, YEAR_BINDING, YEAR_INPUT_ID, YEAR_OUTPUT_ID};
use crate::projection::{WIN_TALLY_MAP_TITLE, WINNERS_MAP_TITLE};
use crate::record::Year;

pub const PAGE_TITLE: &str = "World Cup Data";
pub const YEAR_SECTION_TITLE: &str = "Winner & Runner-Up By Year";
pub const YEAR_SELECTOR_LABEL: &str = "Select Year";

pub const WINNERS_MAP_ID: &str = "winners-map";
pub const WIN_TALLY_MAP_ID: &str = "wins-by-country-map";

pub const WINNERS_FIGURE_PATH: &str = "/api/charts/winners";
pub const WIN_TALLY_FIGURE_PATH: &str = "/api/charts/wins";
pub const YEAR_FIGURE_PATH: &str = "/api/charts/year";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Component {
    Heading {
        level: u8,
        text: String,
    },
    Rule,
    Graph {
        id: String,
        figure_path: String,
    },
    /// Discrete slider: only mark values are selectable.
    Slider {
        id: String,
        min: Year,
        max: Year,
        marks: Vec<YearMark>,
        value: Year,
    },
    Block {
        children: Vec<Component>,
    },
}

impl Component {
    fn heading(level: u8, text: &str) -> Self {
        Self::Heading {
            level,
            text: text.to_owned(),
        }
    }

    fn graph(id: &str, figure_path: &str) -> Self {
        Self::Graph {
            id: id.to_owned(),
            figure_path: figure_path.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub children: Vec<Component>,
    pub bindings: Vec<BindingDecl>,
}

impl Layout {
    /// Depth-first walk over every component.
    pub fn components(&self) -> Vec<&Component> {
        fn walk<'a>(components: &'a [Component], out: &mut Vec<&'a Component>) {
            for component in components {
                out.push(component);
                if let Component::Block { children } = component {
                    walk(children, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }
}

/// `years` must be ascending and non-empty for the slider to have a domain.
pub fn dashboard_layout(years: &[Year], initial_year: Year) -> Layout {
    let min = years.first().copied().unwrap_or(initial_year);
    let max = years.last().copied().unwrap_or(initial_year);

    Layout {
        title: PAGE_TITLE.to_owned(),
        children: vec![
            Component::heading(1, PAGE_TITLE),
            Component::Rule,
            Component::heading(3, WINNERS_MAP_TITLE),
            Component::graph(WINNERS_MAP_ID, WINNERS_FIGURE_PATH),
            Component::Rule,
            Component::heading(3, WIN_TALLY_MAP_TITLE),
            Component::graph(WIN_TALLY_MAP_ID, WIN_TALLY_FIGURE_PATH),
            Component::Rule,
            Component::heading(3, YEAR_SECTION_TITLE),
            Component::Block {
                children: vec![
                    Component::heading(4, YEAR_SELECTOR_LABEL),
                    Component::Slider {
                        id: YEAR_INPUT_ID.to_owned(),
                        min,
                        max,
                        marks: year_marks(years),
                        value: initial_year,
                    },
                ],
            },
            Component::graph(YEAR_OUTPUT_ID, YEAR_FIGURE_PATH),
        ],
        bindings: vec![YEAR_BINDING],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_domain_is_exactly_the_tournament_years() {
        let layout = dashboard_layout(&[1930, 1934, 1938], 1930);
        let slider = layout
            .components()
            .into_iter()
            .find_map(|component| match component {
                Component::Slider {
                    min,
                    max,
                    marks,
                    value,
                    ..
                } => Some((*min, *max, marks.clone(), *value)),
                _ => None,
            })
            .expect("layout has a slider");

        assert_eq!(slider.0, 1930);
        assert_eq!(slider.1, 1938);
        assert_eq!(slider.3, 1930);
        let labels: Vec<&str> = slider.2.iter().map(|mark| mark.label.as_str()).collect();
        assert_eq!(labels, vec!["1930", "1934", "1938"]);
    }

    #[test]
    fn layout_has_three_graph_regions_in_page_order() {
        let layout = dashboard_layout(&[1930], 1930);
        let graph_ids: Vec<&str> = layout
            .components()
            .into_iter()
            .filter_map(|component| match component {
                Component::Graph { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            graph_ids,
            vec![WINNERS_MAP_ID, WIN_TALLY_MAP_ID, YEAR_OUTPUT_ID]
        );
    }

    #[test]
    fn layout_declares_year_binding() {
        let layout = dashboard_layout(&[1930], 1930);
        assert_eq!(layout.bindings, vec![YEAR_BINDING]);
        let json = serde_json::to_value(&layout).expect("serialize layout");
        assert_eq!(json["bindings"][0]["input_id"], "world-cup-year");
        assert_eq!(json["bindings"][0]["output_id"], "winner-and-runner-up-map");
        assert_eq!(json["children"][0]["component"], "heading");
    }
}

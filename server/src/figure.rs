//! `ChartSpec` → plotly figure JSON for the browser-side renderer.

use serde_json::{Value, json};
use worldcup_shared::{ChartPoint, ChartSpec, ColorMapping, LocationMode};

const FALLBACK_COLOR: &str = "#999999";

pub fn figure_json(spec: &ChartSpec) -> Value {
    let data = match &spec.color_mapping {
        ColorMapping::Discrete { .. } => discrete_traces(spec),
        ColorMapping::Continuous { min, max, stops } => {
            vec![continuous_trace(spec, *min, *max, stops)]
        }
    };
    json!({
        "data": data,
        "layout": layout_json(spec),
    })
}

fn location_mode(mode: LocationMode) -> &'static str {
    match mode {
        LocationMode::CountryNames => "country names",
    }
}

/// One single-color trace per category, in order of first appearance, so the
/// legend reads like a categorical choropleth.
fn discrete_traces(spec: &ChartSpec) -> Vec<Value> {
    let mut categories: Vec<&str> = Vec::new();
    for point in &spec.points {
        if let Some(category) = point.color.as_category()
            && !categories.contains(&category)
        {
            categories.push(category);
        }
    }

    categories
        .into_iter()
        .map(|category| {
            let members: Vec<&ChartPoint> = spec
                .points
                .iter()
                .filter(|point| point.color.as_category() == Some(category))
                .collect();
            let color = spec
                .color_mapping
                .color_for(category)
                .unwrap_or(FALLBACK_COLOR);
            json!({
                "type": "choropleth",
                "name": category,
                "legendgroup": category,
                "showlegend": true,
                "showscale": false,
                "locationmode": location_mode(spec.location_mode),
                "locations": members.iter().map(|p| p.location.as_str()).collect::<Vec<_>>(),
                "z": vec![1; members.len()],
                "colorscale": [[0.0, color], [1.0, color]],
                "hovertext": members.iter().map(|p| p.hover.as_str()).collect::<Vec<_>>(),
                "hovertemplate": format!("<b>%{{hovertext}}</b><br>{category}<extra></extra>"),
            })
        })
        .collect()
}

fn continuous_trace(spec: &ChartSpec, min: f64, max: f64, stops: &[(f64, String)]) -> Value {
    let values: Vec<f64> = spec
        .points
        .iter()
        .map(|point| point.color.as_number().unwrap_or(min))
        .collect();
    let colorscale: Vec<Value> = stops
        .iter()
        .map(|(position, color)| json!([position, color]))
        .collect();
    let mut colorbar = json!({});
    if let Some(title) = &spec.color_title {
        colorbar["title"] = json!({ "text": title });
    }

    json!({
        "type": "choropleth",
        "locationmode": location_mode(spec.location_mode),
        "locations": spec.locations().collect::<Vec<_>>(),
        "z": values,
        "zmin": min,
        "zmax": max,
        "colorscale": colorscale,
        "colorbar": colorbar,
        "hovertext": spec.points.iter().map(|p| p.hover.as_str()).collect::<Vec<_>>(),
        "hovertemplate": "<b>%{hovertext}</b><br>%{z}<extra></extra>",
    })
}

fn layout_json(spec: &ChartSpec) -> Value {
    let mut layout = json!({
        "geo": {
            "showframe": false,
            "showcoastlines": true,
            "projection": { "type": "natural earth" },
        },
        "margin": { "t": 50, "r": 0, "b": 0, "l": 0 },
    });
    if let Some(title) = &spec.title {
        layout["title"] = json!({ "text": title });
    }
    if let Some(color_title) = &spec.color_title
        && matches!(spec.color_mapping, ColorMapping::Discrete { .. })
    {
        layout["legend"] = json!({ "title": { "text": color_title } });
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldcup_shared::{
        Record, Table, compute_country_set, compute_win_tally, project_win_tally_map,
        project_winners_map, project_year_map,
    };

    fn table() -> Table {
        Table::new(vec![
            Record::new(1930, "Uruguay", "Argentina"),
            Record::new(1934, "Italy", "Czechoslovakia"),
            Record::new(1938, "Italy", "Hungary"),
        ])
    }

    #[test]
    fn year_map_renders_one_trace_per_role() {
        let spec = project_year_map(&table(), 1938).expect("known year");
        let figure = figure_json(&spec);

        let data = figure["data"].as_array().expect("trace array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Winner");
        assert_eq!(data[0]["locations"], json!(["Italy"]));
        assert_eq!(data[0]["colorscale"], json!([[0.0, "blue"], [1.0, "blue"]]));
        assert_eq!(data[1]["name"], "Runner-Up");
        assert_eq!(data[1]["locations"], json!(["Hungary"]));
        assert_eq!(data[1]["colorscale"][0][1], "yellow");
        assert_eq!(data[0]["locationmode"], "country names");
        assert_eq!(
            figure["layout"]["title"]["text"],
            "World Cup Winner and Runner-Up for 1938"
        );
        assert_eq!(figure["layout"]["legend"]["title"]["text"], "Result");
    }

    #[test]
    fn winners_map_groups_repeat_champions_into_one_trace() {
        let figure = figure_json(&project_winners_map(&table()));
        let data = figure["data"].as_array().expect("trace array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["name"], "Italy");
        assert_eq!(data[1]["locations"], json!(["Italy", "Italy"]));
        assert_eq!(data[1]["z"], json!([1, 1]));
        assert!(figure["layout"].get("legend").is_none());
    }

    #[test]
    fn win_tally_renders_single_continuous_trace() {
        let table = table();
        let tally = compute_win_tally(&table, &compute_country_set(&table)).expect("tally");
        let figure = figure_json(&project_win_tally_map(&tally));

        let data = figure["data"].as_array().expect("trace array");
        assert_eq!(data.len(), 1);
        assert_eq!(
            data[0]["locations"],
            json!(["Uruguay", "Italy", "Argentina", "Czechoslovakia", "Hungary"])
        );
        assert_eq!(data[0]["z"], json!([1.0, 2.0, 0.0, 0.0, 0.0]));
        assert_eq!(data[0]["zmax"], json!(2.0));
        assert_eq!(data[0]["colorbar"]["title"]["text"], "Wins");
    }
}

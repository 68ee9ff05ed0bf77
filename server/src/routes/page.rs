use std::fmt::Write as _;

use axum::extract::State;
use axum::response::Html;
use worldcup_shared::{Component, Layout};

use crate::state::AppState;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.layout().await))
}

pub(crate) fn render_page(layout: &Layout) -> String {
    let mut body = String::new();
    for component in &layout.children {
        render_component(&mut body, component);
    }

    let (input_id, output_id) = layout
        .bindings
        .first()
        .map_or(("", ""), |binding| (binding.input_id, binding.output_id));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script src="{PLOTLY_SRC}"></script>
<style>
body {{ font-family: sans-serif; margin: 0 2rem; }}
.graph {{ min-height: 450px; }}
.slider input[type=range] {{ width: 100%; }}
.marks {{ display: flex; justify-content: space-between; font-size: 0.8rem; }}
</style>
</head>
<body data-input="{input}" data-output="{output}">
{body}<script>
{script}
</script>
</body>
</html>
"#,
        title = escape(&layout.title),
        input = escape(input_id),
        output = escape(output_id),
        script = PAGE_SCRIPT,
    )
}

fn render_component(out: &mut String, component: &Component) {
    match component {
        Component::Heading { level, text } => {
            let _ = writeln!(out, "<h{level}>{}</h{level}>", escape(text));
        }
        Component::Rule => out.push_str("<hr>\n"),
        Component::Graph { id, figure_path } => {
            let _ = writeln!(
                out,
                r#"<div class="graph" id="{}" data-figure="{}"></div>"#,
                escape(id),
                escape(figure_path)
            );
        }
        Component::Slider {
            id, marks, value, ..
        } => {
            // The range input walks mark indices so only mark years are reachable.
            let selected = marks
                .iter()
                .position(|mark| mark.value == *value)
                .unwrap_or(0);
            let years: Vec<String> = marks.iter().map(|mark| mark.value.to_string()).collect();
            let _ = writeln!(out, r#"<div class="slider">"#);
            let _ = writeln!(
                out,
                r#"<input type="range" id="{id}" min="0" max="{max}" step="1" value="{selected}" list="{id}-marks" data-years="{years}">"#,
                id = escape(id),
                max = marks.len().saturating_sub(1),
                years = years.join(","),
            );
            let _ = writeln!(out, r#"<datalist id="{}-marks">"#, escape(id));
            for (idx, mark) in marks.iter().enumerate() {
                let _ = writeln!(
                    out,
                    r#"<option value="{idx}" label="{}"></option>"#,
                    escape(&mark.label)
                );
            }
            out.push_str("</datalist>\n<div class=\"marks\">");
            for mark in marks {
                let _ = write!(out, "<span>{}</span>", escape(&mark.label));
            }
            out.push_str("</div>\n</div>\n");
        }
        Component::Block { children } => {
            out.push_str("<div>\n");
            for child in children {
                render_component(out, child);
            }
            out.push_str("</div>\n");
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const PAGE_SCRIPT: &str = r#"(function () {
  const render = (el, figure) =>
    Plotly.react(el, figure.data, figure.layout, { responsive: true });

  document.querySelectorAll("[data-figure]").forEach((el) => {
    fetch(el.dataset.figure)
      .then((resp) => resp.json())
      .then((figure) => render(el, figure));
  });

  const slider = document.getElementById(document.body.dataset.input);
  const output = document.getElementById(document.body.dataset.output);
  if (!slider || !output) return;
  const years = slider.dataset.years.split(",").map(Number);

  slider.addEventListener("change", () => {
    const year = years[Number(slider.value)];
    fetch("/api/selection", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ year }),
    });
  });

  const events = new EventSource("/api/events");
  events.addEventListener("year-map", (event) => {
    const payload = JSON.parse(event.data);
    const idx = years.indexOf(payload.year);
    if (idx >= 0) slider.value = String(idx);
    render(output, payload.figure);
  });
})();"#;

//! Server-rendered page: input panel, echo table, result area

use crate::models::{FieldKind, FieldSpec, PredictionForm, FIELDS};
use crate::pipeline::Prediction;

pub const TITLE: &str = "Creep Strain Prediction App";

/// What the result area shows
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Prediction),
    Error(String),
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn widget(spec: &FieldSpec, form: &PredictionForm) -> String {
    let current = form.value_of(spec.key).unwrap_or_default();

    let control = match spec.kind {
        FieldKind::Select { options } => {
            let opts: String = options
                .iter()
                .map(|opt| {
                    let selected = if *opt == current { " selected" } else { "" };
                    format!(
                        r#"<option value="{v}"{selected}>{v}</option>"#,
                        v = escape(opt),
                        selected = selected
                    )
                })
                .collect();
            format!(r#"<select id="{k}" name="{k}">{opts}</select>"#, k = spec.key, opts = opts)
        }
        // Step only drives the schema; the browser must accept any decimal
        FieldKind::Number { min, max, .. } => {
            let max_attr = max.map(|m| format!(r#" max="{}""#, m)).unwrap_or_default();
            format!(
                r#"<input type="number" id="{k}" name="{k}" value="{v}" min="{min}"{max_attr} step="any" required>"#,
                k = spec.key,
                v = escape(&current),
                min = min,
                max_attr = max_attr
            )
        }
    };

    format!(
        r#"<label for="{k}">{label}</label>{control}"#,
        k = spec.key,
        label = escape(spec.label),
        control = control
    )
}

fn echo_table(form: &PredictionForm) -> String {
    let header: String = FIELDS
        .iter()
        .map(|f| format!("<th>{}</th>", escape(f.column)))
        .collect();
    let row: String = FIELDS
        .iter()
        .map(|f| format!("<td>{}</td>", escape(&form.value_of(f.key).unwrap_or_default())))
        .collect();

    format!(
        "<h3>User Input Parameters</h3><table class=\"echo\"><thead><tr>{}</tr></thead><tbody><tr>{}</tr></tbody></table>",
        header, row
    )
}

fn outcome_box(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(prediction) => {
            format!(r#"<div class="success">{}</div>"#, escape(&prediction.display()))
        }
        Outcome::Error(msg) => {
            format!(r#"<div class="error">An error occurred: {}</div>"#, escape(msg))
        }
    }
}

/// Render the full page
pub fn page(form: &PredictionForm, outcome: Option<&Outcome>) -> String {
    let widgets: String = FIELDS.iter().map(|f| widget(f, form)).collect();
    let result = outcome.map(outcome_box).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; display: flex; margin: 0; }}
aside {{ width: 20rem; padding: 1rem; background: #f0f2f6; }}
aside label {{ display: block; margin-top: .6rem; font-size: .9rem; }}
aside input, aside select {{ width: 100%; }}
main {{ padding: 1rem 2rem; overflow-x: auto; }}
table.echo {{ border-collapse: collapse; font-size: .8rem; }}
table.echo th, table.echo td {{ border: 1px solid #ccc; padding: .2rem .4rem; white-space: nowrap; }}
.success {{ background: #dff0d8; padding: .8rem; margin-top: 1rem; }}
.error {{ background: #f8d7da; padding: .8rem; margin-top: 1rem; }}
</style>
</head>
<body>
<form method="post" action="/" style="display: contents">
<aside>
<h2>Input Features</h2>
{widgets}
</aside>
<main>
<h1>{title}</h1>
<p>This app predicts the <strong>Creep Strain Value</strong> based on concrete material properties and environmental conditions.</p>
{echo}
<button type="submit" formaction="/">Update</button>
<button type="submit" formaction="/predict">Predict</button>
{result}
</main>
</form>
</body>
</html>
"#,
        title = TITLE,
        widgets = widgets,
        echo = echo_table(form),
        result = result
    )
}

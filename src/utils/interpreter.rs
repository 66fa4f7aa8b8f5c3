use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::{
    ChartAnalysis, ChartType, DEFAULT_TITLE, DEFAULT_X_AXIS_LABEL, DEFAULT_Y_AXIS_LABEL,
};

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("model output is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("model output is JSON but not an object")]
    NotAnObject,
}

//? Opening fence with an optional language tag, e.g. ```json
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*").expect("leading fence pattern"));

/// A fenced block somewhere inside surrounding prose.
static INNER_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*\s*(.*?)```").expect("inner fence pattern")
});

/// Every field is optional and untyped so a single bad field can't sink the whole answer.
///
/// The `recommendedChartType`/`suggestedTitle`/`insights` names are an older answer shape
/// that still maps onto the same analysis.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    chart_type: Option<Value>,
    #[serde(default)]
    recommended_chart_type: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    suggested_title: Option<Value>,
    #[serde(default)]
    x_axis_label: Option<Value>,
    #[serde(default)]
    y_axis_label: Option<Value>,
    #[serde(default)]
    categories: Option<Value>,
    #[serde(default)]
    series: Option<Value>,
    #[serde(default)]
    reasoning: Option<Value>,
    #[serde(default)]
    insights: Option<Value>,
}

impl From<RawAnalysis> for ChartAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        let chart_type = text(raw.chart_type.as_ref())
            .or_else(|| text(raw.recommended_chart_type.as_ref()))
            .map(|kind| ChartType::from(kind.as_str()))
            .unwrap_or_default();

        ChartAnalysis {
            chart_type,
            title: text(raw.title.as_ref())
                .or_else(|| text(raw.suggested_title.as_ref()))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            x_axis_label: text(raw.x_axis_label.as_ref())
                .unwrap_or_else(|| DEFAULT_X_AXIS_LABEL.to_string()),
            y_axis_label: text(raw.y_axis_label.as_ref())
                .unwrap_or_else(|| DEFAULT_Y_AXIS_LABEL.to_string()),
            categories: categories(raw.categories.as_ref()),
            series: series(raw.series.as_ref()),
            reasoning: text(raw.reasoning.as_ref())
                .or_else(|| text(raw.insights.as_ref()))
                .unwrap_or_default(),
        }
    }
}

/// Turns free-form model output into a [`ChartAnalysis`].
///
/// The JSON object is located first (fences, then braces), then each field is mapped on
/// its own, falling back to its default when absent or of the wrong type. Only a
/// candidate that isn't a JSON object at all is a [`ParseFailure`].
pub fn interpret(raw: &str) -> Result<ChartAnalysis, ParseFailure> {
    let candidate = extract_json_candidate(raw);
    let value: Value = serde_json::from_str(candidate)?;

    if !value.is_object() {
        return Err(ParseFailure::NotAnObject);
    }

    let raw_analysis: RawAnalysis = serde_json::from_value(value)?;
    Ok(raw_analysis.into())
}

/// Picks the span of `raw` that should hold the JSON answer.
pub fn extract_json_candidate(raw: &str) -> &str {
    let trimmed = raw.trim();

    let candidate = strip_fences(trimmed)
        .or_else(|| {
            INNER_FENCE
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|inner| inner.as_str().trim())
        })
        .unwrap_or(trimmed);

    match (candidate.find('{'), candidate.rfind('}')) {
        (Some(start), Some(end)) if end > start => &candidate[start..=end],
        _ => candidate,
    }
}

/// Removes one leading and one trailing fence marker. `None` when neither is there.
fn strip_fences(text: &str) -> Option<&str> {
    let mut rest = text;
    let mut fenced = false;

    if let Some(found) = LEADING_FENCE.find(rest) {
        rest = &rest[found.end()..];
        fenced = true;
    }
    if let Some(stripped) = rest.strip_suffix("```") {
        rest = stripped;
        fenced = true;
    }

    fenced.then(|| rest.trim())
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn categories(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

fn series(value: Option<&Value>) -> IndexMap<String, Vec<f64>> {
    let Some(Value::Object(map)) = value else {
        return IndexMap::new();
    };

    map.iter()
        .filter_map(|(name, values)| {
            let Value::Array(items) = values else {
                tracing::debug!("[LLM] Dropping series '{}': values are not an array", name);
                return None;
            };
            Some((name.clone(), items.iter().map(number).collect()))
        })
        .collect()
}

//? Non-numeric entries become 0.0 rather than being dropped, otherwise every later value
//? would slide onto the wrong category.
fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::{ChartAnalysis, ChartType};

/// Reasoning text carried by every locally derived analysis.
pub const FALLBACK_REASONING: &str = "Fallback analysis due to LLM service unavailability";
pub const FALLBACK_TITLE: &str = "Data Visualization";
pub const FALLBACK_X_AXIS_LABEL: &str = "Categories";
pub const FALLBACK_Y_AXIS_LABEL: &str = "Values";
pub const FALLBACK_SERIES_NAME: &str = "Series 1";

/// Derives a bar chart straight from the shape of `data`, no model involved.
///
/// - sequences get one `Item N` category per element, numbers (or the numeric fields of
///   objects) feed a single series
/// - mappings turn each key into a category and each numeric value into the series value,
///   in key order
/// - anything else gives an empty chart
///
/// The requested chart type is ignored on purpose, this always answers `BAR`.
pub fn fallback(data: &Value, title: Option<&str>) -> ChartAnalysis {
    let mut categories = Vec::new();
    let mut values = Vec::new();

    match data {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                categories.push(format!("Item {}", index + 1));
                match item {
                    Value::Number(n) => values.extend(n.as_f64()),
                    Value::Object(fields) => {
                        values.extend(fields.values().filter_map(Value::as_f64));
                    }
                    _ => {}
                }
            }
        }
        Value::Object(fields) => {
            for (key, value) in fields {
                categories.push(key.clone());
                values.extend(value.as_f64());
            }
        }
        _ => {}
    }

    tracing::debug!(
        "[FALLBACK] Derived {} categories and {} values",
        categories.len(),
        values.len()
    );

    let mut series = IndexMap::new();
    series.insert(FALLBACK_SERIES_NAME.to_string(), values);

    ChartAnalysis {
        chart_type: ChartType::Bar,
        title: title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_TITLE)
            .to_string(),
        x_axis_label: FALLBACK_X_AXIS_LABEL.to_string(),
        y_axis_label: FALLBACK_Y_AXIS_LABEL.to_string(),
        categories,
        series,
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

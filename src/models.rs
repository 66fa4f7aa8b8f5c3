use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Chart kinds the renderer knows how to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
}

impl From<&str> for ChartType {
    /// Parses a chart type case-insensitively.
    ///
    /// Anything that isn't one of the known kinds resolves to `ChartType::Bar`.
    fn from(kind: &str) -> Self {
        match kind.trim().to_uppercase().as_str() {
            "LINE" => Self::Line,
            "PIE" => Self::Pie,
            "SCATTER" => Self::Scatter,
            _ => Self::Bar,
        }
    }
}

impl From<String> for ChartType {
    fn from(kind: String) -> Self {
        Self::from(kind.as_str())
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bar => "BAR",
            Self::Line => "LINE",
            Self::Pie => "PIE",
            Self::Scatter => "SCATTER",
        };
        f.write_str(name)
    }
}

pub const DEFAULT_TITLE: &str = "Chart";
pub const DEFAULT_X_AXIS_LABEL: &str = "Category";
pub const DEFAULT_Y_AXIS_LABEL: &str = "Value";

/// The canonical chart recommendation, produced either from a model answer or by the fallback.
///
/// Every series is aligned to `categories` by position. When a series is shorter than
/// `categories` only the overlapping prefix gets plotted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalysis {
    pub chart_type: ChartType,
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub categories: Vec<String>,
    pub series: IndexMap<String, Vec<f64>>,
    pub reasoning: String,
}

impl Default for ChartAnalysis {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Bar,
            title: DEFAULT_TITLE.to_string(),
            x_axis_label: DEFAULT_X_AXIS_LABEL.to_string(),
            y_axis_label: DEFAULT_Y_AXIS_LABEL.to_string(),
            categories: Vec::new(),
            series: IndexMap::new(),
            reasoning: String::new(),
        }
    }
}

impl ChartAnalysis {
    /// True when this analysis was derived locally instead of by the model.
    pub fn is_fallback(&self) -> bool {
        self.reasoning
            .starts_with(crate::utils::fallback::FALLBACK_REASONING)
    }
}

/// Inbound payload. Every field is optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub chart_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub data: Option<Value>,
    pub labels: Option<Vec<String>>,
    pub values: Option<Vec<f64>>,
}

impl ChartRequest {
    /// Resolves the payload into the single JSON value the pipeline works on.
    ///
    /// A non-empty `data` wins over `labels`/`values`. Parallel sequences are zipped
    /// up to the shorter one into an ordered mapping.
    pub fn dataset(&self) -> Value {
        if let Some(data) = self.data.as_ref().filter(|data| !is_blank(data)) {
            return data.clone();
        }

        if let (Some(labels), Some(values)) = (&self.labels, &self.values) {
            let pairs: Map<String, Value> = labels
                .iter()
                .zip(values)
                .map(|(label, value)| (label.clone(), Value::from(*value)))
                .collect();
            return Value::Object(pairs);
        }

        Value::Object(Map::new())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

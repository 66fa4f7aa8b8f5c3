use serde_json::Value;
use std::fmt::Write;

use super::sanitize::sanitize;

/// Upper bound on the number of lines the data outline may take inside a prompt.
pub const MAX_OUTLINE_LINES: usize = 400;

const INSTRUCTIONS: &str =
    "Analyze the following data and recommend the best chart type to visualize it.";

const ANSWER_CONTRACT: &str = r#"Respond with a single JSON object and nothing else. Do not add prose, comments or markdown.
The object must have exactly this shape:
{
  "chartType": one of "BAR", "LINE", "PIE", "SCATTER",
  "title": string,
  "xAxisLabel": string,
  "yAxisLabel": string,
  "categories": array of strings in plot order,
  "series": object mapping each series name to an array of numbers aligned with categories,
  "reasoning": string with a brief explanation of the chosen chart type
}
Extract the numeric values from the data and organize them for the chart."#;

/// Optional caller hints that end up in the prompt next to the data.
#[derive(Clone, Copy, Debug, Default)]
pub struct PromptHints<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub chart_type: Option<&'a str>,
}

/// Builds the instruction sent to the model.
///
/// Every key and string leaf of `data`, and every hint, goes through [`sanitize`] first.
/// The output only depends on its inputs.
pub fn build_prompt(data: &Value, hints: PromptHints<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nData:\n");
    prompt.push_str(&outline(data));
    prompt.push('\n');

    let hint_lines = [
        ("Requested chart type", hints.chart_type),
        ("Title", hints.title),
        ("Description", hints.description),
    ];
    for (label, hint) in hint_lines {
        let cleaned = sanitize(hint);
        if !cleaned.is_empty() {
            let _ = writeln!(prompt, "{label}: {cleaned}");
        }
    }

    prompt.push('\n');
    prompt.push_str(ANSWER_CONTRACT);
    prompt
}

/// Restates arbitrary JSON as an indented `key: value` outline.
pub fn outline(data: &Value) -> String {
    let mut lines = Vec::new();
    write_value(&mut lines, data, 0);

    if lines.is_empty() {
        lines.push("(no data)".to_string());
    }

    let total = lines.len();
    if total > MAX_OUTLINE_LINES {
        lines.truncate(MAX_OUTLINE_LINES);
        lines.push(format!("... ({} more lines omitted)", total - MAX_OUTLINE_LINES));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn write_value(lines: &mut Vec<String>, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let key = sanitize(Some(key));
                match scalar(child) {
                    Some(text) => lines.push(format!("{indent}{key}: {text}")),
                    None => {
                        lines.push(format!("{indent}{key}:"));
                        write_value(lines, child, depth + 1);
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match scalar(item) {
                    Some(text) => lines.push(format!("{indent}- {text}")),
                    None => {
                        lines.push(format!("{indent}-"));
                        write_value(lines, item, depth + 1);
                    }
                }
            }
        }
        other => {
            if let Some(text) = scalar(other) {
                lines.push(format!("{indent}{text}"));
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(sanitize(Some(s))),
        Value::Object(map) if map.is_empty() => Some("(empty)".to_string()),
        Value::Array(items) if items.is_empty() => Some("(empty)".to_string()),
        _ => None,
    }
}

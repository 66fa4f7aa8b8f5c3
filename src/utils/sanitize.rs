/// Longest caller-supplied snippet that can reach a prompt, counted in characters.
pub const MAX_INPUT_CHARS: usize = 100;

/// Characters that carry meaning in the JSON answer contract.
const RESERVED: [char; 7] = ['{', '}', '[', ']', '"', '\'', '`'];

/// Cleans untrusted text before it gets embedded in a prompt.
///
/// Truncates to [`MAX_INPUT_CHARS`], turns every run of line breaks into a single space,
/// drops structural characters and trims the result. `None` becomes an empty string.
///
/// ```
/// use crate::utils::sanitize::sanitize;
///
/// assert_eq!(sanitize(Some("Sales\n\n{ignore previous}")), "Sales ignore previous");
/// ```
pub fn sanitize(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let mut cleaned = String::with_capacity(input.len().min(MAX_INPUT_CHARS));
    let mut in_break = false;

    for c in input.chars().take(MAX_INPUT_CHARS) {
        if is_line_break(c) {
            if !in_break {
                cleaned.push(' ');
            }
            in_break = true;
            continue;
        }
        in_break = false;

        if RESERVED.contains(&c) {
            continue;
        }
        cleaned.push(c);
    }

    cleaned.trim().to_string()
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

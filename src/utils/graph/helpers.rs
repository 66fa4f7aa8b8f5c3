use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Draw `text` with its top-left corner at (x, y). Skipped when no font is loaded.
pub fn draw_label(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    text: &str,
    x: i32,
    y: i32,
    size: f32,
    colour: Rgba<u8>,
) {
    let Some(font) = font else {
        return;
    };
    if text.is_empty() {
        return;
    }
    draw_text_mut(img, colour, x, y, PxScale::from(size), font, text);
}

/// Same as [`draw_label`] but horizontally centred on `center_x`.
pub fn draw_centered_label(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    text: &str,
    center_x: f32,
    y: i32,
    size: f32,
    colour: Rgba<u8>,
) {
    let width = label_width(font, text, size);
    draw_label(img, font, text, (center_x - width as f32 / 2.0).round() as i32, y, size, colour);
}

/// Rendered width of `text` in pixels, or a rough estimate when there is no font.
pub fn label_width(font: Option<&FontArc>, text: &str, size: f32) -> i32 {
    match font {
        Some(font) => text_size(PxScale::from(size), font, text).0 as i32,
        None => (text.chars().count() as f32 * size * 0.6).round() as i32,
    }
}

/// Cut `text` down to `max_chars`, marking the cut with "..".
pub fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2).max(1);
    let mut short: String = text.chars().take(keep).collect();
    short.push_str("..");
    short
}

/// Draw a dashed horizontal line on the image
pub fn draw_dashed_horizontal_line(
    img: &mut RgbaImage,
    y: f32,
    x_start: f32,
    x_end: f32,
    color: Rgba<u8>,
    dash_length: i32,
    gap_length: i32,
) {
    let y = y.round() as i32;
    let x_start = x_start.round() as i32;
    let x_end = x_end.round() as i32;

    let mut x = x_start;
    let mut drawing_dash = true;

    while x < x_end {
        if drawing_dash {
            let dash_end = (x + dash_length).min(x_end);
            for px in x..dash_end {
                if px >= 0 && px < img.width() as i32 && y >= 0 && y < img.height() as i32 {
                    img.put_pixel(px as u32, y as u32, color);
                }
            }
            x += dash_length;
        } else {
            x += gap_length;
        }
        drawing_dash = !drawing_dash;
    }
}

/// Round `raw` up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 2.5 {
        2.5
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Tick text with just enough decimals for the step size.
pub fn format_tick(value: f64, step: f64) -> String {
    //? Snap tiny float noise to zero so we never print "-0"
    let value = if value.abs() < step.abs() * 1e-6 { 0.0 } else { value };

    let decimals = if step.fract().abs() < 1e-9 {
        0
    } else {
        ((-step.log10()).ceil().max(0.0) as usize + 1).min(4)
    };

    format!("{value:.decimals$}")
}

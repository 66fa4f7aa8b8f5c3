use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;
use std::f32::consts::TAU;

use super::helpers::{
    draw_centered_label, draw_dashed_horizontal_line, draw_label, format_tick, label_width,
    shorten,
};
use super::types::{CategoryDataset, HEIGHT, Palette, PlotArea, ValueScale, WIDTH, series_colour};

const TITLE_SIZE: f32 = 26.0;
const AXIS_LABEL_SIZE: f32 = 16.0;
const TICK_LABEL_SIZE: f32 = 13.0;
const LEGEND_SIZE: f32 = 14.0;

/// Chart title, centred across the top of the canvas
pub fn draw_title(img: &mut RgbaImage, font: Option<&FontArc>, title: &str, palette: &Palette) {
    let title = shorten(title, 48);
    draw_centered_label(img, font, &title, WIDTH as f32 / 2.0, 14, TITLE_SIZE, palette.bright);
}

/// Legend row under the title, right-aligned to the plot area.
pub fn draw_legend(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    entries: &[(String, Rgba<u8>)],
    area: &PlotArea,
    palette: &Palette,
) {
    if entries.is_empty() {
        return;
    }

    let swatch = 12;
    let gap = 20;
    let widths: Vec<i32> = entries
        .iter()
        .map(|(label, _)| swatch + 6 + label_width(font, label, LEGEND_SIZE))
        .collect();
    let total: i32 = widths.iter().sum::<i32>() + gap * (entries.len() as i32 - 1);

    let legend_y = 50;
    let mut x = (area.right as i32 - total).max(10);

    for ((label, colour), width) in entries.iter().zip(widths) {
        if x >= WIDTH as i32 {
            break;
        }
        draw_filled_rect_mut(
            img,
            Rect::at(x, legend_y + 2).of_size(swatch as u32, swatch as u32),
            *colour,
        );
        draw_label(img, font, label, x + swatch + 6, legend_y, LEGEND_SIZE, palette.bright);
        x += width + gap;
    }
}

/// Y axis with dashed grid lines, tick values and the axis caption above it.
pub fn draw_value_axis(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    area: &PlotArea,
    scale: &ValueScale,
    y_label: &str,
    palette: &Palette,
) {
    for tick in scale.ticks() {
        let y = scale.project_y(tick, area);

        if (tick - scale.min).abs() > f64::EPSILON {
            draw_dashed_horizontal_line(img, y, area.left, area.right, palette.grid, 6, 4);
        }

        let text = format_tick(tick, scale.step);
        let text_w = label_width(font, &text, TICK_LABEL_SIZE);
        draw_label(
            img,
            font,
            &text,
            area.left as i32 - 8 - text_w,
            y as i32 - 7,
            TICK_LABEL_SIZE,
            palette.dim,
        );
    }

    draw_line_segment_mut(img, (area.left, area.top), (area.left, area.bottom), palette.axis);
    draw_label(
        img,
        font,
        &shorten(y_label, 40),
        12,
        area.top as i32 - 24,
        AXIS_LABEL_SIZE,
        palette.dim,
    );
}

/// Horizontal pixel centre of the category slot `index` out of `count`.
fn category_center(area: &PlotArea, index: usize, count: usize) -> f32 {
    let group_w = area.width() / count.max(1) as f32;
    area.left + group_w * (index as f32 + 0.5)
}

/// X axis line at the zero baseline, category names under the plot and the axis caption.
pub fn draw_category_axis(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    area: &PlotArea,
    categories: &[String],
    baseline: f32,
    x_label: &str,
    palette: &Palette,
) {
    draw_line_segment_mut(img, (area.left, baseline), (area.right, baseline), palette.axis);

    let count = categories.len();
    if count > 0 {
        let group_w = area.width() / count as f32;
        //? Only label every n-th category when they would not fit side by side
        let max_labels = ((area.width() / 48.0) as usize).max(1);
        let stride = count.div_ceil(max_labels);
        let max_chars = ((group_w * stride as f32) / 8.0).max(3.0) as usize;

        for (index, category) in categories.iter().enumerate().step_by(stride) {
            draw_centered_label(
                img,
                font,
                &shorten(category, max_chars),
                category_center(area, index, count),
                area.bottom as i32 + 10,
                TICK_LABEL_SIZE,
                palette.dim,
            );
        }
    }

    draw_centered_label(
        img,
        font,
        &shorten(x_label, 60),
        area.left + area.width() / 2.0,
        HEIGHT as i32 - 34,
        AXIS_LABEL_SIZE,
        palette.dim,
    );
}

/// Pixel row of the value zero, clamped into the scale.
pub fn baseline_y(scale: &ValueScale, area: &PlotArea) -> f32 {
    scale.project_y(0.0_f64.clamp(scale.min, scale.max), area)
}

/// Grouped bars, one group per category and one bar per series inside each group.
pub fn draw_bars(
    img: &mut RgbaImage,
    area: &PlotArea,
    dataset: &CategoryDataset,
    scale: &ValueScale,
) {
    let count = dataset.categories.len();
    if count == 0 || dataset.series.is_empty() {
        return;
    }

    let group_w = area.width() / count as f32;
    let bar_w = group_w * 0.8 / dataset.series.len() as f32;
    let baseline = baseline_y(scale, area);

    for (series_index, (name, values)) in dataset.series.iter().enumerate() {
        let colour = series_colour(series_index);
        tracing::trace!("[GRAPH] Drawing {} bars for series '{}'", values.len(), name);

        for (category_index, value) in values.iter().enumerate() {
            let x = area.left + group_w * category_index as f32 + group_w * 0.1
                + bar_w * series_index as f32;
            let y = scale.project_y(*value, area);
            let top = y.min(baseline);
            let height = (y - baseline).abs().round().max(1.0) as u32;
            let width = (bar_w.floor() - 1.0).max(1.0) as u32;

            draw_filled_rect_mut(
                img,
                Rect::at(x.round() as i32, top.round() as i32).of_size(width, height),
                colour,
            );
        }
    }
}

/// One polyline per series through the category centres, with a dot on every point.
pub fn draw_lines(
    img: &mut RgbaImage,
    area: &PlotArea,
    dataset: &CategoryDataset,
    scale: &ValueScale,
) {
    let count = dataset.categories.len();
    if count == 0 {
        return;
    }

    for (series_index, (name, values)) in dataset.series.iter().enumerate() {
        let colour = series_colour(series_index);
        tracing::trace!(
            "[GRAPH] Drawing line with {} points for series '{}'",
            values.len(),
            name
        );

        let points: Vec<(f32, f32)> = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                (
                    category_center(area, index, count),
                    scale.project_y(*value, area),
                )
            })
            .collect();

        for pair in points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            for offset in [-1.0_f32, 0.0, 1.0] {
                draw_line_segment_mut(
                    img,
                    (start.0, start.1 + offset),
                    (end.0, end.1 + offset),
                    colour,
                );
            }
        }

        for (x, y) in points {
            draw_filled_circle_mut(img, (x.round() as i32, y.round() as i32), 4, colour);
        }
    }
}

/// Scatter of every series, x being the position of the value inside its own series.
pub fn draw_scatter(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    area: &PlotArea,
    series: &[(&str, &[f64])],
    x_label: &str,
    y_label: &str,
    palette: &Palette,
) {
    let longest = series.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
    let x_scale = ValueScale::from_values((0..longest).map(|index| index as f64));
    let y_scale =
        ValueScale::from_values(series.iter().flat_map(|(_, values)| values.iter().copied()));

    draw_value_axis(img, font, area, &y_scale, y_label, palette);

    let baseline = baseline_y(&y_scale, area);
    draw_line_segment_mut(img, (area.left, baseline), (area.right, baseline), palette.axis);

    for tick in x_scale.ticks() {
        let x = x_scale.project_x(tick, area);
        draw_centered_label(
            img,
            font,
            &format_tick(tick, x_scale.step),
            x,
            area.bottom as i32 + 10,
            TICK_LABEL_SIZE,
            palette.dim,
        );
    }
    draw_centered_label(
        img,
        font,
        &shorten(x_label, 60),
        area.left + area.width() / 2.0,
        HEIGHT as i32 - 34,
        AXIS_LABEL_SIZE,
        palette.dim,
    );

    for (series_index, (_, values)) in series.iter().enumerate() {
        let colour = series_colour(series_index);
        for (index, value) in values.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let x = x_scale.project_x(index as f64, area);
            let y = y_scale.project_y(*value, area);
            draw_filled_circle_mut(img, (x.round() as i32, y.round() as i32), 5, colour);
        }
    }
}

/// Pie of `slices`, starting at 12 o'clock and going clockwise.
///
/// Non-positive values get no wedge. Returns the legend entries for the drawn slices.
pub fn draw_pie(
    img: &mut RgbaImage,
    font: Option<&FontArc>,
    area: &PlotArea,
    slices: &[(&str, f64)],
    palette: &Palette,
) -> Vec<(String, Rgba<u8>)> {
    let (cx, cy) = area.center();
    let radius = (area.width().min(area.height()) / 2.0 - 10.0).max(1.0);

    let largest = slices
        .iter()
        .map(|(_, value)| *value)
        .filter(|value| value.is_finite())
        .fold(0.0_f64, f64::max);

    // Relative to the largest slice so the total cannot overflow
    let wedges: Vec<(usize, &str, f64)> = slices
        .iter()
        .enumerate()
        .filter(|(_, (_, value))| value.is_finite() && *value > 0.0)
        .map(|(index, (name, value))| (index, *name, *value / largest))
        .collect();
    let total: f64 = wedges.iter().map(|(_, _, value)| value).sum();

    if wedges.is_empty() || total <= 0.0 {
        tracing::debug!("[GRAPH] Pie has no positive values, drawing empty outline");
        draw_hollow_circle_mut(
            img,
            (cx.round() as i32, cy.round() as i32),
            radius as i32,
            palette.grid,
        );
        draw_centered_label(img, font, "No data", cx, cy as i32 - 8, AXIS_LABEL_SIZE, palette.dim);
        return Vec::new();
    }

    // Running totals so each pixel can look up its wedge by angle
    let mut cumulative = Vec::with_capacity(wedges.len());
    let mut running = 0.0_f64;
    for (_, _, value) in &wedges {
        running += value;
        cumulative.push(running);
    }

    let r2 = radius * radius;
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(img.width() - 1);
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = ((cy + radius).ceil() as u32).min(img.height() - 1);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy > r2 {
                continue;
            }

            let mut angle = dx.atan2(-dy);
            if angle < 0.0 {
                angle += TAU;
            }
            let target = (angle / TAU) as f64 * total;
            let wedge = cumulative
                .iter()
                .position(|end| target < *end)
                .unwrap_or(wedges.len() - 1);

            img.put_pixel(px, py, series_colour(wedges[wedge].0));
        }
    }

    if wedges.len() > 1 {
        let mut start = 0.0_f64;
        for (_, _, value) in &wedges {
            let theta = (start / total) as f32 * TAU;
            let edge = (cx + radius * theta.sin(), cy - radius * theta.cos());
            draw_line_segment_mut(img, (cx, cy), edge, palette.bg);
            start += value;
        }
    }

    wedges
        .iter()
        .map(|(index, name, value)| {
            (
                format!("{} ({:.1}%)", shorten(name, 18), value / total * 100.0),
                series_colour(*index),
            )
        })
        .collect()
}

mod drawing;
mod helpers;
mod types;

use drawing::{
    baseline_y, draw_bars, draw_category_axis, draw_legend, draw_lines, draw_pie, draw_scatter,
    draw_title, draw_value_axis,
};
pub use types::{CategoryDataset, HEIGHT, WIDTH};
use types::{Palette, PlotArea, ValueScale, series_colour};

use crate::models::{ChartAnalysis, ChartType};
use ab_glyph::FontArc;
use anyhow::{Result, anyhow};
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The finished raster could not be written out as PNG.
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Reads and parses a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontArc> {
    let font_bytes = std::fs::read(path)
        .map_err(|e| anyhow!("Failed to read font {}: {}", path.display(), e))?;
    FontArc::try_from_vec(font_bytes).map_err(|_| anyhow!("Failed to parse font"))
}

/// Turns a [`ChartAnalysis`] into an 800x600 PNG.
///
/// Rendering is a pure function of the analysis: the same input always gives the same bytes.
/// Without a font every shape is still drawn, only the text is left out.
#[derive(Clone, Default)]
pub struct ChartRenderer {
    font: Option<FontArc>,
}

impl ChartRenderer {
    pub fn new(font: Option<FontArc>) -> Self {
        ChartRenderer { font }
    }

    /// Loads the font at `path`, falling back to text-less rendering when that fails.
    pub fn from_font_path(path: &Path) -> Self {
        match load_font(path) {
            Ok(font) => {
                tracing::info!("[GRAPH] Loaded font from {}", path.display());
                ChartRenderer::new(Some(font))
            }
            Err(e) => {
                tracing::warn!("[GRAPH] {}, charts will be rendered without text", e);
                ChartRenderer::new(None)
            }
        }
    }

    pub fn render(&self, analysis: &ChartAnalysis) -> Result<Vec<u8>, RenderError> {
        tracing::info!(
            "[GRAPH] Rendering {} chart '{}' with {} categories and {} series",
            analysis.chart_type,
            analysis.title,
            analysis.categories.len(),
            analysis.series.len()
        );

        let palette = Palette::default();
        let area = PlotArea::default();
        let font = self.font.as_ref();
        let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, palette.bg);

        draw_title(&mut img, font, &analysis.title, &palette);

        let dataset = CategoryDataset::from_analysis(analysis);
        let series_legend: Vec<_> = analysis
            .series
            .keys()
            .enumerate()
            .map(|(index, name)| (name.clone(), series_colour(index)))
            .collect();

        match analysis.chart_type {
            ChartType::Pie => {
                let slices = dataset.first_series_slices();
                let legend = draw_pie(&mut img, font, &area, &slices, &palette);
                draw_legend(&mut img, font, &legend, &area, &palette);
            }
            ChartType::Scatter => {
                let series: Vec<(&str, &[f64])> = analysis
                    .series
                    .iter()
                    .map(|(name, values)| (name.as_str(), values.as_slice()))
                    .collect();
                draw_scatter(
                    &mut img,
                    font,
                    &area,
                    &series,
                    &analysis.x_axis_label,
                    &analysis.y_axis_label,
                    &palette,
                );
                draw_legend(&mut img, font, &series_legend, &area, &palette);
            }
            ChartType::Line | ChartType::Bar => {
                let scale = ValueScale::from_values(dataset.values());
                draw_value_axis(&mut img, font, &area, &scale, &analysis.y_axis_label, &palette);

                if analysis.chart_type == ChartType::Line {
                    draw_lines(&mut img, &area, &dataset, &scale);
                } else {
                    draw_bars(&mut img, &area, &dataset, &scale);
                }

                draw_category_axis(
                    &mut img,
                    font,
                    &area,
                    dataset.categories,
                    baseline_y(&scale, &area),
                    &analysis.x_axis_label,
                    &palette,
                );
                draw_legend(&mut img, font, &series_legend, &area, &palette);
            }
        }

        encode_png(img)
    }
}

fn encode_png(img: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out_buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out_buf), image::ImageFormat::Png)
        .map_err(|e| {
            tracing::error!("[GRAPH] Failed to encode PNG: {}", e);
            RenderError::Encode(e)
        })?;

    tracing::debug!("[GRAPH] Encoded PNG ({} bytes)", out_buf.len());
    Ok(out_buf)
}

use image::Rgba;

use super::helpers::nice_step;
use crate::models::ChartAnalysis;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

/// Number of intervals the value axis is split into, before rounding to a nice step.
pub const GRID_LINES: usize = 5;

/// Largest magnitude the value axis covers. Anything beyond is pinned to the edge so the
/// range, step and rounded bounds all stay finite.
pub const MAX_AXIS_MAGNITUDE: f64 = f64::MAX / 16.0;

/// Hard ceiling on the number of ticks a single axis can produce.
pub const MAX_TICKS: usize = GRID_LINES * 4;

/// Colours shared by every chart kind.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub bg: Rgba<u8>,
    pub grid: Rgba<u8>,
    pub axis: Rgba<u8>,
    pub bright: Rgba<u8>,
    pub dim: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            bg: Rgba([17u8, 24u8, 28u8, 255u8]),
            grid: Rgba([30u8, 41u8, 47u8, 255u8]),
            axis: Rgba([148u8, 163u8, 184u8, 255u8]),
            bright: Rgba([248u8, 250u8, 252u8, 255u8]),
            dim: Rgba([148u8, 163u8, 184u8, 255u8]),
        }
    }
}

const SERIES_COLOURS: [Rgba<u8>; 8] = [
    Rgba([96u8, 165u8, 250u8, 255u8]),
    Rgba([251u8, 191u8, 36u8, 255u8]),
    Rgba([52u8, 211u8, 153u8, 255u8]),
    Rgba([255u8, 69u8, 58u8, 255u8]),
    Rgba([192u8, 132u8, 252u8, 255u8]),
    Rgba([255u8, 159u8, 10u8, 255u8]),
    Rgba([45u8, 212u8, 191u8, 255u8]),
    Rgba([244u8, 114u8, 182u8, 255u8]),
];

/// Colour of the n-th series (or pie slice), cycling through the palette.
pub fn series_colour(index: usize) -> Rgba<u8> {
    SERIES_COLOURS[index % SERIES_COLOURS.len()]
}

/// The rectangle data gets drawn into, in pixels.
#[derive(Clone, Copy, Debug)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for PlotArea {
    fn default() -> Self {
        let left_margin = 80.0_f32;
        let right_margin = 40.0_f32;
        let top_margin = 90.0_f32;
        let bottom_margin = 80.0_f32;

        PlotArea {
            left: left_margin,
            top: top_margin,
            right: WIDTH as f32 - right_margin,
            bottom: HEIGHT as f32 - bottom_margin,
        }
    }
}

impl PlotArea {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }
}

/// A linear axis rounded outwards to whole steps. Always includes zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueScale {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(-MAX_AXIS_MAGNITUDE, MAX_AXIS_MAGNITUDE))
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if hi - lo <= f64::EPSILON {
            return ValueScale {
                min: 0.0,
                max: 1.0,
                step: nice_step(1.0 / GRID_LINES as f64),
            };
        }

        let step = nice_step((hi - lo) / GRID_LINES as f64);
        ValueScale {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round();
        if !count.is_finite() || count < 0.0 {
            return vec![self.min, self.max];
        }
        let count = (count as usize).min(MAX_TICKS);
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    /// Position of `value` between `min` (0.0) and `max` (1.0), pinned to that range.
    fn normalize(&self, value: f64) -> f32 {
        let normalized = (value.max(self.min).min(self.max) - self.min) / (self.max - self.min);
        if normalized.is_finite() {
            normalized as f32
        } else {
            0.0
        }
    }

    /// Vertical pixel position of `value` inside `area`.
    pub fn project_y(&self, value: f64, area: &PlotArea) -> f32 {
        area.bottom - self.normalize(value) * area.height()
    }

    /// Horizontal pixel position of `value` inside `area`.
    pub fn project_x(&self, value: f64, area: &PlotArea) -> f32 {
        area.left + self.normalize(value) * area.width()
    }
}

/// Category-keyed view of an analysis: each series cut down to at most one value per category.
#[derive(Debug)]
pub struct CategoryDataset<'a> {
    pub categories: &'a [String],
    pub series: Vec<(&'a str, &'a [f64])>,
}

impl<'a> CategoryDataset<'a> {
    pub fn from_analysis(analysis: &'a ChartAnalysis) -> Self {
        let categories = analysis.categories.as_slice();
        let series = analysis
            .series
            .iter()
            .map(|(name, values)| {
                let visible = values.len().min(categories.len());
                (name.as_str(), &values[..visible])
            })
            .collect();

        CategoryDataset { categories, series }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|(_, values)| values.iter().copied())
    }

    /// Pie slices: the first series paired positionally with the categories.
    pub fn first_series_slices(&self) -> Vec<(&'a str, f64)> {
        let Some((_, values)) = self.series.first() else {
            return Vec::new();
        };

        self.categories
            .iter()
            .zip(values.iter())
            .map(|(category, value)| (category.as_str(), *value))
            .collect()
    }
}

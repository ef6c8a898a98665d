//! Shared drawing helpers for the chart views.

use crate::render::{ChartStyle, FontSafeBackend};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// A chart rasterized to an RGB pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for RenderedChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedChart")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Rasterize a figure of the given default size (inches) in memory.
///
/// The drawing area is filled with the theme background before `draw` runs.
pub fn render_chart<F>(
    style: &ChartStyle,
    inches: (f64, f64),
    draw: F,
) -> anyhow::Result<RenderedChart>
where
    F: FnOnce(&DrawingArea<FontSafeBackend<BitMapBackend<'_>>, Shift>) -> anyhow::Result<()>,
{
    let (width, height) = style.pixels(inches);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    {
        let backend = BitMapBackend::with_buffer(&mut pixels, (width, height));
        let root = FontSafeBackend::new(backend).into_drawing_area();
        root.fill(&style.theme.background())?;
        draw(&root)?;
        root.present()?;
    }

    Ok(RenderedChart {
        width,
        height,
        pixels,
    })
}

/// Marker shapes, cycled per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
    Square,
    Triangle,
}

impl Marker {
    const CYCLE: [Marker; 4] = [
        Marker::Circle,
        Marker::Cross,
        Marker::Square,
        Marker::Triangle,
    ];

    pub fn nth(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}

/// Draw one marker per point, each with its own size in pixels, and register
/// a legend entry when `label` is given.
pub fn draw_markers<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    points: &[((f64, f64), u32)],
    marker: Marker,
    style: ShapeStyle,
    label: Option<&str>,
    legend_size: u32,
) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    match marker {
        Marker::Circle => {
            let anno = chart.draw_series(points.iter().map(|&(p, r)| Circle::new(p, r, style)))?;
            if let Some(label) = label {
                anno.label(label)
                    .legend(move |(x, y)| Circle::new((x, y), legend_size, style));
            }
        }
        Marker::Cross => {
            let anno = chart.draw_series(points.iter().map(|&(p, r)| Cross::new(p, r, style)))?;
            if let Some(label) = label {
                anno.label(label)
                    .legend(move |(x, y)| Cross::new((x, y), legend_size, style));
            }
        }
        Marker::Square => {
            let anno = chart.draw_series(points.iter().map(|&(p, r)| {
                let s = r as i32;
                EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], style)
            }))?;
            if let Some(label) = label {
                let s = legend_size as i32;
                anno.label(label).legend(move |(x, y)| {
                    EmptyElement::at((x, y)) + Rectangle::new([(-s, -s), (s, s)], style)
                });
            }
        }
        Marker::Triangle => {
            let anno = chart.draw_series(
                points
                    .iter()
                    .map(|&(p, r)| TriangleMarker::new(p, r, style)),
            )?;
            if let Some(label) = label {
                anno.label(label)
                    .legend(move |(x, y)| TriangleMarker::new((x, y), legend_size, style));
            }
        }
    }
    Ok(())
}

/// Draw the series legend in the upper right corner of the plotting area.
pub fn draw_legend<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    CT: CoordTranslate,
{
    chart
        .configure_series_labels()
        .background_style(style.theme.background().mix(0.85))
        .border_style(RGBColor(204, 204, 204))
        .label_font(("sans-serif", style.font(10.0)))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

/// Axis range covering `values` with a 5% margin on both sides.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        return 0.0..1.0;
    }
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad)..(max + pad);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Axis range from zero to just above the largest value.
pub fn zero_based_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if max <= 0.0 {
        0.0..1.0
    } else {
        0.0..max * 1.1
    }
}

/// Range for a logarithmic axis over the positive entries of `values`.
pub fn log_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        return 1.0..10.0;
    }
    (min / 1.5)..(max * 1.5)
}

/// Tick label for a categorical axis drawn on integer positions.
///
/// Positions that are not an integer index into `names` get no label.
pub fn category_label(names: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

//! View 4: mean contention per thread total, one line per (kind, lock type).

use crate::render::{
    draw_legend, draw_markers, padded_range, render_chart, zero_based_range, ChartStyle, Marker,
    Palette, RenderedChart,
};
use crate::table::{BenchmarkTable, Column, ContentionKind};
use crate::transform::{mean_by, melt_contention};
use crate::views::{Requirement, View, ViewId};
use plotters::coord::Shift;
use plotters::prelude::*;

const TITLE: &str = "Contention vs TotalThreads";
const FIGURE_INCHES: (f64, f64) = (14.0, 8.0);

#[derive(Debug, Clone, PartialEq)]
pub struct ContentionLine {
    pub kind: ContentionKind,
    pub lock_type: String,
    pub lock_index: usize,
    /// `(total_threads, mean count)` sorted by thread total
    pub points: Vec<(f64, f64)>,
}

/// Melt every contention column and average per thread total, for each
/// (kind, lock type) pair that has at least one observation.
pub fn contention_lines(table: &BenchmarkTable) -> Vec<ContentionLine> {
    let melted = melt_contention(table, &ContentionKind::ALL);
    let locks = table.lock_types();

    let mut lines = Vec::new();
    for kind in ContentionKind::ALL {
        for (lock_index, lock_type) in locks.iter().enumerate() {
            let means = mean_by(
                melted
                    .iter()
                    .filter(|o| o.kind == kind && o.lock_type == *lock_type)
                    .filter_map(|o| o.total_threads.map(|t| (t, o.count))),
            );
            if means.is_empty() {
                continue;
            }
            lines.push(ContentionLine {
                kind,
                lock_type: lock_type.to_string(),
                lock_index,
                points: means
                    .into_iter()
                    .map(|(t, mean)| (t as f64, mean))
                    .collect(),
            });
        }
    }
    lines
}

pub struct ContentionThreadLines;

impl View for ContentionThreadLines {
    fn id(&self) -> ViewId {
        ViewId::new(4)
    }

    fn name(&self) -> &'static str {
        "contention_vs_threads"
    }

    fn requirement(&self) -> Requirement {
        Requirement::all(&[
            Column::LockType,
            Column::TotalThreads,
            Column::MutexContention,
            Column::ReadContention,
            Column::WriteContention,
        ])
    }

    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart> {
        let lines = contention_lines(table);
        render_chart(style, FIGURE_INCHES, |root| draw(root, &lines, style))
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    lines: &[ContentionLine],
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points = || lines.iter().flat_map(|l| l.points.iter());
    let x_range = padded_range(points().map(|p| p.0));
    let y_range = zero_based_range(points().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", style.font(16.0)))
        .margin(style.px(20.0))
        .x_label_area_size(style.px(60.0))
        .y_label_area_size(style.px(90.0))
        .build_cartesian_2d(x_range, y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Total Threads (Consumer + Reader)")
        .y_desc("Contention Count")
        .axis_desc_style(("sans-serif", style.font(14.0)))
        .label_style(("sans-serif", style.font(10.0)))
        .light_line_style(TRANSPARENT);
    match style.theme.grid() {
        Some(grid) => {
            mesh.bold_line_style(grid);
        }
        None => {
            mesh.disable_mesh();
        }
    }
    mesh.draw()?;

    let width = style.px(2.0);
    let marker_size = style.px(5.0);
    for line in lines {
        let kind_index = ContentionKind::ALL
            .iter()
            .position(|k| *k == line.kind)
            .unwrap_or(0);
        let color = Palette::Deep.color(kind_index);

        chart.draw_series(LineSeries::new(
            line.points.iter().copied(),
            color.stroke_width(width),
        ))?;

        let markers: Vec<((f64, f64), u32)> =
            line.points.iter().map(|&p| (p, marker_size)).collect();
        let label = format!("{} / {}", line.kind.label(), line.lock_type);
        draw_markers(
            &mut chart,
            &markers,
            Marker::nth(line.lock_index),
            color.filled(),
            Some(label.as_str()),
            marker_size,
        )?;
    }

    if !lines.is_empty() {
        draw_legend(&mut chart, style)?;
    }
    Ok(())
}

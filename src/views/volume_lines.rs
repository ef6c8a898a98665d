//! View 3: mean read and write time against operation count.

use crate::render::{
    draw_legend, log_range, render_chart, zero_based_range, ChartStyle, Palette, RenderedChart,
};
use crate::table::{BenchmarkRecord, BenchmarkTable, Column};
use crate::transform::mean_by;
use crate::views::{Requirement, View, ViewId};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

const TITLE: &str = "OperationCount vs TotalReadTime & TotalWriteTime";
const FIGURE_INCHES: (f64, f64) = (12.0, 6.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VolumeMetric {
    Write,
    Read,
}

impl VolumeMetric {
    pub const ALL: [VolumeMetric; 2] = [VolumeMetric::Write, VolumeMetric::Read];

    pub fn value(self, record: &BenchmarkRecord) -> f64 {
        match self {
            VolumeMetric::Write => record.total_write_time_us,
            VolumeMetric::Read => record.total_read_time_us,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VolumeMetric::Write => "Total Write Time",
            VolumeMetric::Read => "Total Read Time",
        }
    }
}

/// Mean of one timing metric per operation count, for one lock type.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeLine {
    pub lock_type: String,
    /// Index of the lock type in first-appearance order, used for colour
    pub lock_index: usize,
    pub metric: VolumeMetric,
    /// `(operation_count, mean time)` sorted by operation count
    pub points: Vec<(f64, f64)>,
}

/// One write line and one read line per lock type.
pub fn volume_lines(table: &BenchmarkTable) -> Vec<VolumeLine> {
    let mut lines = Vec::new();
    for (lock_index, lock_type) in table.lock_types().into_iter().enumerate() {
        for metric in VolumeMetric::ALL {
            let means = mean_by(
                table
                    .records()
                    .iter()
                    .filter(|r| r.lock_type == lock_type)
                    .map(|r| (r.operation_count, metric.value(r))),
            );
            lines.push(VolumeLine {
                lock_type: lock_type.to_string(),
                lock_index,
                metric,
                points: means
                    .into_iter()
                    .map(|(ops, mean)| (ops as f64, mean))
                    .collect(),
            });
        }
    }
    lines
}

pub struct OperationVolumeLines;

impl View for OperationVolumeLines {
    fn id(&self) -> ViewId {
        ViewId::new(3)
    }

    fn name(&self) -> &'static str {
        "operation_count_vs_time"
    }

    fn requirement(&self) -> Requirement {
        Requirement::all(&[
            Column::LockType,
            Column::OperationCount,
            Column::TotalReadTime,
            Column::TotalWriteTime,
        ])
    }

    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart> {
        let lines = volume_lines(table);
        render_chart(style, FIGURE_INCHES, |root| draw(root, &lines, style))
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    lines: &[VolumeLine],
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points = || lines.iter().flat_map(|l| l.points.iter());
    let x_range = log_range(points().map(|p| p.0));
    let y_range = zero_based_range(points().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", style.font(16.0)))
        .margin(style.px(20.0))
        .x_label_area_size(style.px(60.0))
        .y_label_area_size(style.px(90.0))
        .build_cartesian_2d(x_range.log_scale(), y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Operation Count (log scale)")
        .y_desc("Total Time (us)")
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
    let dash = style.px(8.0);
    let gap = style.px(5.0);
    let half = style.px(12.0) as i32;
    let marker = style.px(3.0);

    for line in lines {
        let stroke = Palette::Deep.color(line.lock_index).stroke_width(width);
        let label = format!("{} / {}", line.metric.label(), line.lock_type);
        match line.metric {
            VolumeMetric::Write => {
                chart
                    .draw_series(DashedLineSeries::new(
                        line.points.iter().copied(),
                        dash,
                        gap,
                        stroke,
                    ))?
                    .label(label)
                    .legend(move |(x, y)| {
                        EmptyElement::at((x, y))
                            + PathElement::new(vec![(-half, 0), (-half / 4, 0)], stroke)
                            + PathElement::new(vec![(half / 4, 0), (half, 0)], stroke)
                    });
            }
            VolumeMetric::Read => {
                chart
                    .draw_series(LineSeries::new(line.points.iter().copied(), stroke))?
                    .label(label)
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x - half, y), (x + half, y)], stroke)
                    });
            }
        }
        chart.draw_series(
            line.points
                .iter()
                .map(|&p| Circle::new(p, marker, stroke.color.filled())),
        )?;
    }

    if !lines.is_empty() {
        draw_legend(&mut chart, style)?;
    }
    Ok(())
}

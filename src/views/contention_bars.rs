//! View 2: mean contention per lock type, clustered by contention kind.

use crate::render::{
    category_label, draw_legend, render_chart, zero_based_range, ChartStyle, Palette,
    RenderedChart,
};
use crate::table::{BenchmarkTable, Column, ContentionKind};
use crate::transform::{mean_by, melt_contention};
use crate::views::{Requirement, View, ViewId, CONTENTION_COLUMNS};
use plotters::coord::Shift;
use plotters::prelude::*;

const TITLE: &str = "LockType vs Contention Count";
const FIGURE_INCHES: (f64, f64) = (12.0, 6.0);

/// Fraction of a category slot covered by its bar cluster.
const CLUSTER_WIDTH: f64 = 0.8;

/// One bar: the mean count of one contention kind for one lock type.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    /// Position of the lock type on the x axis
    pub lock_index: usize,
    pub lock_type: String,
    pub kind: ContentionKind,
    /// Position of the bar within its cluster (and its colour)
    pub kind_index: usize,
    pub mean: f64,
}

/// Melt the present contention columns and average each (lock type, kind) pair.
pub fn bar_segments(table: &BenchmarkTable) -> Vec<BarSegment> {
    let kinds = table.schema().contention_kinds();
    let locks = table.lock_types();

    let melted = melt_contention(table, &kinds);
    let keyed = melted.iter().filter_map(|o| {
        let lock = locks.iter().position(|l| *l == o.lock_type)?;
        let kind = kinds.iter().position(|k| *k == o.kind)?;
        Some(((lock, kind), o.count))
    });

    mean_by(keyed)
        .into_iter()
        .map(|((lock_index, kind_index), mean)| BarSegment {
            lock_index,
            lock_type: locks[lock_index].to_string(),
            kind: kinds[kind_index],
            kind_index,
            mean,
        })
        .collect()
}

pub struct ContentionBars;

impl View for ContentionBars {
    fn id(&self) -> ViewId {
        ViewId::new(2)
    }

    fn name(&self) -> &'static str {
        "contention_by_lock_type"
    }

    fn requirement(&self) -> Requirement {
        Requirement::all(&[Column::LockType]).any(CONTENTION_COLUMNS)
    }

    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart> {
        let segments = bar_segments(table);
        let locks: Vec<String> = table.lock_types().into_iter().map(String::from).collect();
        let kinds = table.schema().contention_kinds();
        render_chart(style, FIGURE_INCHES, |root| {
            draw(root, &segments, &locks, &kinds, style)
        })
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    segments: &[BarSegment],
    locks: &[String],
    kinds: &[ContentionKind],
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let slots = locks.len().max(1) as f64;
    let y_range = zero_based_range(segments.iter().map(|s| s.mean));

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", style.font(16.0)))
        .margin(style.px(20.0))
        .x_label_area_size(style.px(60.0))
        .y_label_area_size(style.px(90.0))
        .build_cartesian_2d(-0.5..(slots - 0.5), y_range)?;

    let label_names = locks.to_vec();
    let label_fmt = move |v: &f64| category_label(&label_names, *v);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Lock Type")
        .y_desc("Contention Count")
        .axis_desc_style(("sans-serif", style.font(14.0)))
        .label_style(("sans-serif", style.font(10.0)))
        .x_labels(locks.len() * 2 + 1)
        .x_label_formatter(&label_fmt)
        .disable_x_mesh()
        .light_line_style(TRANSPARENT);
    match style.theme.grid() {
        Some(grid) => {
            mesh.bold_line_style(grid);
        }
        None => {
            mesh.disable_y_mesh();
        }
    }
    mesh.draw()?;

    let bar_width = CLUSTER_WIDTH / kinds.len().max(1) as f64;
    let edge = style.theme.foreground().mix(0.6);
    for (kind_index, kind) in kinds.iter().enumerate() {
        let color = Palette::Set3.color(kind_index);
        let bars: Vec<[(f64, f64); 2]> = segments
            .iter()
            .filter(|s| s.kind_index == kind_index)
            .map(|s| {
                let left =
                    s.lock_index as f64 - CLUSTER_WIDTH / 2.0 + kind_index as f64 * bar_width;
                [(left, 0.0), (left + bar_width, s.mean)]
            })
            .collect();

        let legend_half = style.px(6.0) as i32;
        chart
            .draw_series(
                bars.iter()
                    .map(|corners| Rectangle::new(*corners, color.filled())),
            )?
            .label(kind.label())
            .legend(move |(x, y)| {
                Rectangle::new(
                    [(x - legend_half, y - legend_half), (x + legend_half, y + legend_half)],
                    color.filled(),
                )
            });
        chart.draw_series(
            bars.iter()
                .map(|corners| Rectangle::new(*corners, edge.stroke_width(1))),
        )?;
    }

    if !kinds.is_empty() {
        draw_legend(&mut chart, style)?;
    }
    Ok(())
}

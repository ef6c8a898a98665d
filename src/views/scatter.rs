//! View 1: total threads against total time, one point per run.

use crate::render::{
    draw_legend, draw_markers, padded_range, render_chart, ChartStyle, Marker, Palette,
    RenderedChart,
};
use crate::table::{BenchmarkTable, Column};
use crate::transform::distinct_sorted;
use crate::views::{Requirement, View, ViewId};
use plotters::coord::Shift;
use plotters::prelude::*;

const TITLE: &str = "Impact of Total Threads on TotalTime(us)";
const FIGURE_INCHES: (f64, f64) = (14.0, 8.0);

/// Marker area range in square points, mapped linearly from OperationCount.
const MARKER_AREA: (f64, f64) = (50.0, 300.0);

/// Operation counts listed in the size legend at most.
const MAX_SIZE_LEGEND: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub total_threads: u64,
    pub total_time_us: f64,
    pub operation_count: u64,
    pub consumers: u64,
    pub readers: u64,
    /// Marker area in square points
    pub area: f64,
}

/// Points of one lock type.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub lock_type: String,
    pub points: Vec<ScatterPoint>,
}

/// Group rows by lock type, sizing each point by its operation count.
pub fn scatter_series(table: &BenchmarkTable) -> Vec<ScatterSeries> {
    let (min_ops, max_ops) = table
        .records()
        .iter()
        .map(|r| r.operation_count as f64)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    table
        .lock_types()
        .into_iter()
        .map(|lock_type| ScatterSeries {
            lock_type: lock_type.to_string(),
            points: table
                .records()
                .iter()
                .filter(|r| r.lock_type == lock_type)
                .map(|r| ScatterPoint {
                    total_threads: r
                        .total_threads
                        .unwrap_or_else(|| r.consumer_count.saturating_add(r.reader_count)),
                    total_time_us: r.total_time_us,
                    operation_count: r.operation_count,
                    consumers: r.consumer_count,
                    readers: r.reader_count,
                    area: marker_area(r.operation_count as f64, min_ops, max_ops),
                })
                .collect(),
        })
        .collect()
}

fn marker_area(value: f64, min: f64, max: f64) -> f64 {
    let (small, large) = MARKER_AREA;
    if max > min {
        small + (value - min) / (max - min) * (large - small)
    } else {
        (small + large) / 2.0
    }
}

/// Two-line point label: consumer count above reader count.
fn annotation_lines(point: &ScatterPoint) -> [String; 2] {
    [
        format!("C:{}", point.consumers),
        format!("R:{}", point.readers),
    ]
}

/// Marker radius in pixels for an area in square points.
fn marker_radius(area: f64, style: &ChartStyle) -> u32 {
    let radius_pt = (area / std::f64::consts::PI).sqrt();
    (radius_pt * style.dpi as f64 / 72.0).round().max(1.0) as u32
}

pub struct ThreadsLatencyScatter;

impl View for ThreadsLatencyScatter {
    fn id(&self) -> ViewId {
        ViewId::new(1)
    }

    fn name(&self) -> &'static str {
        "threads_vs_total_time"
    }

    fn requirement(&self) -> Requirement {
        Requirement::all(&[
            Column::LockType,
            Column::TotalThreads,
            Column::TotalTime,
            Column::OperationCount,
        ])
    }

    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart> {
        let series = scatter_series(table);
        render_chart(style, FIGURE_INCHES, |root| draw(root, &series, style))
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &[ScatterSeries],
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points = move || series.iter().flat_map(|s| s.points.iter());
    let x_range = padded_range(points().map(|p| p.total_threads as f64));
    let y_range = padded_range(points().map(|p| p.total_time_us));

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", style.font(16.0)))
        .margin(style.px(20.0))
        .x_label_area_size(style.px(60.0))
        .y_label_area_size(style.px(90.0))
        .build_cartesian_2d(x_range, y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Total Threads (Consumer + Reader)")
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

    let legend_size = style.px(6.0);
    for (i, s) in series.iter().enumerate() {
        let color = Palette::Deep.color(i);
        let markers: Vec<((f64, f64), u32)> = s
            .points
            .iter()
            .map(|p| {
                (
                    (p.total_threads as f64, p.total_time_us),
                    marker_radius(p.area, style),
                )
            })
            .collect();
        draw_markers(
            &mut chart,
            &markers,
            Marker::nth(i),
            color.mix(0.7).filled(),
            Some(s.lock_type.as_str()),
            legend_size,
        )?;
    }

    // Size legend: one grey entry per operation count
    let op_counts = distinct_sorted(points().map(|p| p.operation_count));
    if op_counts.len() <= MAX_SIZE_LEGEND {
        for ops in op_counts {
            let area = points()
                .find(|p| p.operation_count == ops)
                .map_or(MARKER_AREA.0, |p| p.area);
            let radius = marker_radius(area, style).min(style.px(12.0));
            let grey = RGBColor(110, 110, 110).mix(0.7).filled();
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), u32>>())?
                .label(format!("OperationCount {}", ops))
                .legend(move |(x, y)| Circle::new((x, y), radius, grey));
        }
    }

    let font = ("sans-serif", style.font(8.0))
        .into_font()
        .color(&style.theme.foreground().mix(0.7));
    // Consumer and reader counts stacked under each other
    let line_height = style.font(8.0).ceil() as i32;
    chart.draw_series(points().map(|p| {
        let [consumers, readers] = annotation_lines(p);
        EmptyElement::at((p.total_threads as f64, p.total_time_us))
            + Text::new(consumers, (0, 0), font.clone())
            + Text::new(readers, (0, line_height), font.clone())
    }))?;

    if !series.is_empty() {
        draw_legend(&mut chart, style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{derive_metrics, BenchmarkRecord, TableSchema};

    fn record(lock: &str, consumers: u64, readers: u64, ops: u64, time: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            lock_type: lock.to_string(),
            consumer_count: consumers,
            reader_count: readers,
            operation_count: ops,
            total_time_us: time,
            total_read_time_us: time / 2.0,
            total_write_time_us: time / 2.0,
            mutex_contention: None,
            read_contention: None,
            write_contention: None,
            total_threads: None,
        }
    }

    fn table() -> BenchmarkTable {
        derive_metrics(BenchmarkTable::new(
            TableSchema::new(Column::REQUIRED),
            vec![
                record("Mutex", 1, 0, 1000, 50.0),
                record("RWLock", 2, 4, 10000, 400.0),
                record("Mutex", 2, 4, 5500, 300.0),
            ],
        ))
    }

    #[test]
    fn test_scatter_series_groups_by_lock_type() {
        let series = scatter_series(&table());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].lock_type, "Mutex");
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[1].lock_type, "RWLock");

        let p = &series[1].points[0];
        assert_eq!(p.total_threads, 6);
        assert_eq!((p.consumers, p.readers), (2, 4));
    }

    #[test]
    fn test_marker_area_spans_operation_counts() {
        let series = scatter_series(&table());
        assert_eq!(series[0].points[0].area, 50.0);
        assert_eq!(series[1].points[0].area, 300.0);
        assert_eq!(series[0].points[1].area, 175.0);
    }

    #[test]
    fn test_annotation_has_one_line_per_count() {
        let series = scatter_series(&table());
        assert_eq!(
            annotation_lines(&series[1].points[0]),
            ["C:2".to_string(), "R:4".to_string()]
        );
    }

    #[test]
    fn test_single_operation_count_uses_mid_size() {
        assert_eq!(marker_area(1000.0, 1000.0, 1000.0), 175.0);
    }

    #[test]
    fn test_render_empty_table() {
        let table = derive_metrics(BenchmarkTable::new(
            TableSchema::new(Column::REQUIRED),
            Vec::new(),
        ));
        let style = ChartStyle {
            dpi: 20,
            ..ChartStyle::default()
        };
        let chart = ThreadsLatencyScatter.render(&table, &style).unwrap();
        assert_eq!((chart.width, chart.height), (280, 160));
    }
}

//! Views 5 and 6: timing distributions grouped by a thread count.

use crate::render::{
    category_label, draw_legend, padded_range, render_chart, ChartStyle, Palette, RenderedChart,
};
use crate::table::{BenchmarkRecord, BenchmarkTable, Column};
use crate::transform::{distinct_sorted, BoxStats};
use crate::views::{Requirement, View, ViewId};
use plotters::coord::Shift;
use plotters::prelude::*;

const FIGURE_INCHES: (f64, f64) = (12.0, 6.0);

/// Fraction of a group slot covered by its boxes.
const GROUP_WIDTH: f64 = 0.8;

/// Fraction of a box width covered by the whisker caps.
const CAP_WIDTH: f64 = 0.5;

/// One box: the distribution of a lock type's values at one key.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub key: u64,
    /// Position of the key on the x axis
    pub key_index: usize,
    pub lock_index: usize,
    pub lock_type: String,
    pub stats: BoxStats,
}

/// Summarize `value` for each (key, lock type) pair present in the table.
///
/// Boxes are ordered by key, then by lock type first appearance.
pub fn box_groups(
    table: &BenchmarkTable,
    key: fn(&BenchmarkRecord) -> u64,
    value: fn(&BenchmarkRecord) -> f64,
) -> Vec<BoxGroup> {
    let keys = distinct_sorted(table.records().iter().map(key));
    let locks = table.lock_types();

    let mut groups = Vec::new();
    for (key_index, k) in keys.iter().enumerate() {
        for (lock_index, lock_type) in locks.iter().enumerate() {
            let values: Vec<f64> = table
                .records()
                .iter()
                .filter(|r| key(r) == *k && r.lock_type == *lock_type)
                .map(value)
                .collect();
            if let Some(stats) = BoxStats::from_values(&values) {
                groups.push(BoxGroup {
                    key: *k,
                    key_index,
                    lock_index,
                    lock_type: lock_type.to_string(),
                    stats,
                });
            }
        }
    }
    groups
}

/// Box plot of one timing column grouped by one count column.
pub struct DistributionBoxes {
    id: ViewId,
    name: &'static str,
    title: &'static str,
    x_desc: &'static str,
    y_desc: &'static str,
    palette: Palette,
    columns: &'static [Column],
    key: fn(&BenchmarkRecord) -> u64,
    value: fn(&BenchmarkRecord) -> f64,
}

impl DistributionBoxes {
    pub fn consumer_write_time() -> Self {
        Self {
            id: ViewId::new(5),
            name: "consumer_count_vs_write_time",
            title: "ConsumerCount vs TotalWriteTime",
            x_desc: "Consumer Count",
            y_desc: "Total Write Time (us)",
            palette: Palette::Set2,
            columns: &[Column::LockType, Column::ConsumerCount, Column::TotalWriteTime],
            key: |r| r.consumer_count,
            value: |r| r.total_write_time_us,
        }
    }

    pub fn reader_read_time() -> Self {
        Self {
            id: ViewId::new(6),
            name: "reader_count_vs_read_time",
            title: "ReaderCount vs TotalReadTime",
            x_desc: "Reader Count",
            y_desc: "Total Read Time (us)",
            palette: Palette::Set3,
            columns: &[Column::LockType, Column::ReaderCount, Column::TotalReadTime],
            key: |r| r.reader_count,
            value: |r| r.total_read_time_us,
        }
    }
}

impl View for DistributionBoxes {
    fn id(&self) -> ViewId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn requirement(&self) -> Requirement {
        Requirement::all(self.columns)
    }

    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart> {
        let groups = box_groups(table, self.key, self.value);
        let keys: Vec<String> = distinct_sorted(table.records().iter().map(self.key))
            .into_iter()
            .map(|k| k.to_string())
            .collect();
        let lock_count = table.lock_types().len();
        render_chart(style, FIGURE_INCHES, |root| {
            self.draw(root, &groups, &keys, lock_count, style)
        })
    }
}

impl DistributionBoxes {
    fn draw<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        groups: &[BoxGroup],
        keys: &[String],
        lock_count: usize,
        style: &ChartStyle,
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let slots = keys.len().max(1) as f64;
        let y_range = padded_range(groups.iter().flat_map(|g| {
            let (low, high) = g.stats.extent();
            [low, high]
        }));

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, ("sans-serif", style.font(16.0)))
            .margin(style.px(20.0))
            .x_label_area_size(style.px(60.0))
            .y_label_area_size(style.px(90.0))
            .build_cartesian_2d(-0.5..(slots - 0.5), y_range)?;

        let label_names = keys.to_vec();
        let label_fmt = move |v: &f64| category_label(&label_names, *v);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.x_desc)
            .y_desc(self.y_desc)
            .axis_desc_style(("sans-serif", style.font(14.0)))
            .label_style(("sans-serif", style.font(10.0)))
            .x_labels(keys.len() * 2 + 1)
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

        let box_width = GROUP_WIDTH / lock_count.max(1) as f64;
        let ink = style.theme.foreground().stroke_width(style.px(1.0));
        let outlier_size = style.px(3.0);

        for g in groups {
            let left = g.key_index as f64 - GROUP_WIDTH / 2.0 + g.lock_index as f64 * box_width;
            let right = left + box_width;
            let center = (left + right) / 2.0;
            let cap = box_width * CAP_WIDTH / 2.0;
            let s = &g.stats;
            let fill = self.palette.color(g.lock_index).filled();

            chart.draw_series([
                Rectangle::new([(left, s.q1), (right, s.q3)], fill),
                Rectangle::new([(left, s.q1), (right, s.q3)], ink),
            ])?;
            chart.draw_series([
                PathElement::new(vec![(left, s.median), (right, s.median)], ink),
                PathElement::new(vec![(center, s.q3), (center, s.whisker_high)], ink),
                PathElement::new(vec![(center, s.q1), (center, s.whisker_low)], ink),
                PathElement::new(
                    vec![(center - cap, s.whisker_high), (center + cap, s.whisker_high)],
                    ink,
                ),
                PathElement::new(
                    vec![(center - cap, s.whisker_low), (center + cap, s.whisker_low)],
                    ink,
                ),
            ])?;
            chart.draw_series(
                s.outliers
                    .iter()
                    .map(|&v| Circle::new((center, v), outlier_size, ink)),
            )?;
        }

        // Legend: one entry per lock type that has at least one box
        let mut labelled: Vec<(usize, &str)> = groups
            .iter()
            .map(|g| (g.lock_index, g.lock_type.as_str()))
            .collect();
        labelled.sort_unstable();
        labelled.dedup();

        let half = style.px(6.0) as i32;
        for (lock_index, lock_type) in &labelled {
            let fill = self.palette.color(*lock_index).filled();
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
                .label(*lock_type)
                .legend(move |(x, y)| {
                    Rectangle::new([(x - half, y - half), (x + half, y + half)], fill)
                });
        }

        if !labelled.is_empty() {
            draw_legend(&mut chart, style)?;
        }
        Ok(())
    }
}

//! Chart views over the benchmark table.
//!
//! Each view is an independent projection of the enriched table into one
//! rendered chart. Views declare the columns they need; the driver checks
//! that requirement against the table schema and skips views that cannot run.
//!
//! Every view carries a fixed [`ViewId`] assigned here, so its identity does
//! not depend on which other views ran.

mod contention_bars;
mod contention_lines;
mod distribution;
mod scatter;
mod volume_lines;

pub use contention_bars::{bar_segments, BarSegment, ContentionBars};
pub use contention_lines::{contention_lines, ContentionLine, ContentionThreadLines};
pub use distribution::{box_groups, BoxGroup, DistributionBoxes};
pub use scatter::{scatter_series, ScatterPoint, ScatterSeries, ThreadsLatencyScatter};
pub use volume_lines::{volume_lines, OperationVolumeLines, VolumeLine, VolumeMetric};

use crate::error::{Error, Result};
use crate::render::{ChartStyle, RenderedChart};
use crate::table::{BenchmarkTable, Column, TableSchema};
use serde::Serialize;

/// Stable identifier of a view, used as the default artifact number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ViewId(u8);

impl ViewId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Columns a view needs before it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Every one of these must be present
    pub all_of: &'static [Column],
    /// At least one of these must be present (ignored when empty)
    pub any_of: &'static [Column],
}

impl Requirement {
    pub const fn all(columns: &'static [Column]) -> Self {
        Self {
            all_of: columns,
            any_of: &[],
        }
    }

    pub const fn any(mut self, columns: &'static [Column]) -> Self {
        self.any_of = columns;
        self
    }

    pub fn is_met(&self, schema: &TableSchema) -> bool {
        self.all_of.iter().all(|c| schema.has(*c))
            && (self.any_of.is_empty() || self.any_of.iter().any(|c| schema.has(*c)))
    }

    /// Human-readable description of what is missing, for logging.
    pub fn describe_missing(&self, schema: &TableSchema) -> String {
        let mut missing: Vec<String> = self
            .all_of
            .iter()
            .filter(|c| !schema.has(**c))
            .map(|c| c.header().to_string())
            .collect();

        if !self.any_of.is_empty() && !self.any_of.iter().any(|c| schema.has(*c)) {
            let names: Vec<&str> = self.any_of.iter().map(|c| c.header()).collect();
            missing.push(format!("one of [{}]", names.join(", ")));
        }
        missing.join(", ")
    }
}

/// The contention columns, in melt order.
pub(crate) const CONTENTION_COLUMNS: &[Column] = &[
    Column::MutexContention,
    Column::ReadContention,
    Column::WriteContention,
];

/// A chart-producing projection of the benchmark table.
pub trait View {
    fn id(&self) -> ViewId;

    /// Short name used in logs and the run report.
    fn name(&self) -> &'static str;

    fn requirement(&self) -> Requirement;

    /// Draw the chart. Only called when the requirement is met.
    fn render(&self, table: &BenchmarkTable, style: &ChartStyle) -> anyhow::Result<RenderedChart>;

    fn is_applicable(&self, schema: &TableSchema) -> bool {
        self.requirement().is_met(schema)
    }

    /// Render the chart if the table supports it, `None` otherwise.
    fn generate(
        &self,
        table: &BenchmarkTable,
        style: &ChartStyle,
    ) -> Result<Option<RenderedChart>> {
        if !self.is_applicable(table.schema()) {
            return Ok(None);
        }
        self.render(table, style)
            .map(Some)
            .map_err(|e| Error::Render {
                view: self.id().get(),
                message: format!("{:#}", e),
            })
    }
}

/// All views in their fixed execution order.
pub fn all_views() -> Vec<Box<dyn View>> {
    vec![
        Box::new(ThreadsLatencyScatter),
        Box::new(ContentionBars),
        Box::new(OperationVolumeLines),
        Box::new(ContentionThreadLines),
        Box::new(DistributionBoxes::consumer_write_time()),
        Box::new(DistributionBoxes::reader_read_time()),
    ]
}

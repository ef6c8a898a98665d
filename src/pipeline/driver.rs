//! Runs every view over a derived table and writes the artifacts.

use crate::config::{Config, NumberingMode};
use crate::error::{Error, Result};
use crate::io::{ArtifactWriter, ChartArtifact};
use crate::pipeline::stats::{RunStats, ViewReport, ViewStatus};
use crate::render::ChartStyle;
use crate::table::BenchmarkTable;
use crate::views::{all_views, View, ViewId};
use std::path::PathBuf;
use std::time::Instant;

/// Result of a pipeline run that did not fail.
#[derive(Debug)]
pub enum RunOutcome {
    /// The input file does not exist; nothing was produced
    InputMissing(PathBuf),
    Completed(RunStats),
}

/// Drives the fixed view sequence for one table.
pub struct Driver {
    stem: String,
    numbering: NumberingMode,
    style: ChartStyle,
    writer: ArtifactWriter,
    views: Vec<Box<dyn View>>,
}

impl Driver {
    pub fn new(config: &Config) -> Result<Self> {
        let stem = config
            .input
            .stem()
            .ok_or_else(|| {
                Error::Config(format!(
                    "input file name has no stem: {}",
                    config.input.file_name
                ))
            })?
            .to_string();

        Ok(Self {
            stem,
            numbering: config.output.numbering,
            style: ChartStyle::from(&config.style),
            writer: ArtifactWriter::new(&config.output.dir),
            views: all_views(),
        })
    }

    /// Replace the view sequence.
    pub fn with_views(mut self, views: Vec<Box<dyn View>>) -> Self {
        self.views = views;
        self
    }

    /// Run each view in order. Render and write failures are recorded and
    /// the remaining views still run; failing to create the output
    /// directory aborts the run.
    pub fn run(&self, input: PathBuf, table: &BenchmarkTable) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::new(input, table.len());

        tracing::info!(
            "Rendering {} views into {} (numbering: {})",
            self.views.len(),
            self.writer.dir().display(),
            self.numbering
        );
        self.writer.ensure_dir()?;

        let mut executed = 0;
        for view in &self.views {
            let id = view.id();
            let requirement = view.requirement();
            if !requirement.is_met(table.schema()) {
                let missing = requirement.describe_missing(table.schema());
                tracing::warn!("Skipping view {} ({}): missing {}", id, view.name(), missing);
                stats.record(ViewReport {
                    id: id.get(),
                    name: view.name(),
                    status: ViewStatus::Skipped,
                    artifact: None,
                    detail: Some(format!("missing {}", missing)),
                });
                continue;
            }

            executed += 1;
            let number = self.artifact_number(id, executed);
            tracing::debug!("Rendering view {} ({}) as #{}", id, view.name(), number);

            let report = match self.render_and_write(view.as_ref(), table, number) {
                Ok(path) => ViewReport {
                    id: id.get(),
                    name: view.name(),
                    status: ViewStatus::Written,
                    artifact: Some(path),
                    detail: None,
                },
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("View {} ({}) failed: {}", id, view.name(), e);
                    ViewReport {
                        id: id.get(),
                        name: view.name(),
                        status: ViewStatus::Failed,
                        artifact: None,
                        detail: Some(e.to_string()),
                    }
                }
            };
            stats.record(report);
        }

        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    /// File number for a view: its stable id, or its position among the
    /// views that ran.
    fn artifact_number(&self, id: ViewId, executed: usize) -> usize {
        match self.numbering {
            NumberingMode::Stable => id.get() as usize,
            NumberingMode::ExecutionOrder => executed,
        }
    }

    fn render_and_write(
        &self,
        view: &dyn View,
        table: &BenchmarkTable,
        number: usize,
    ) -> Result<PathBuf> {
        let chart = view.generate(table, &self.style)?.ok_or_else(|| Error::Render {
            view: view.id().get(),
            message: "view is not applicable".to_string(),
        })?;
        let artifact = ChartArtifact::new(&self.stem, number, chart);
        self.writer.write(&artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderedChart;
    use crate::table::{derive_metrics, Column, TableSchema};
    use crate::views::Requirement;
    use tempfile::TempDir;

    struct FixedView {
        id: u8,
        fail: bool,
    }

    impl View for FixedView {
        fn id(&self) -> ViewId {
            ViewId::new(self.id)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn requirement(&self) -> Requirement {
            if self.id == 2 {
                Requirement::all(&[Column::MutexContention])
            } else {
                Requirement::all(&[Column::LockType])
            }
        }

        fn render(
            &self,
            _table: &BenchmarkTable,
            _style: &ChartStyle,
        ) -> anyhow::Result<RenderedChart> {
            if self.fail {
                anyhow::bail!("no ink");
            }
            Ok(RenderedChart {
                width: 2,
                height: 2,
                pixels: vec![255; 12],
            })
        }
    }

    fn config(dir: &TempDir, numbering: NumberingMode) -> Config {
        let mut config = Config::default();
        config.output.dir = dir.path().join("out");
        config.output.numbering = numbering;
        config
    }

    fn views(fail_third: bool) -> Vec<Box<dyn View>> {
        (1..=4)
            .map(|id| {
                Box::new(FixedView {
                    id,
                    fail: fail_third && id == 3,
                }) as Box<dyn View>
            })
            .collect()
    }

    fn table() -> BenchmarkTable {
        derive_metrics(BenchmarkTable::new(
            TableSchema::new(Column::REQUIRED),
            Vec::new(),
        ))
    }

    fn file_names(stats: &RunStats) -> Vec<String> {
        stats
            .artifacts
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_stable_numbering_leaves_gaps() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(&config(&dir, NumberingMode::Stable))
            .unwrap()
            .with_views(views(false));
        let stats = driver.run(PathBuf::from("ResultIO.csv"), &table()).unwrap();

        assert_eq!(
            file_names(&stats),
            vec!["ResultIO_1.png", "ResultIO_3.png", "ResultIO_4.png"]
        );
        assert_eq!(stats.views_skipped, 1);
    }

    #[test]
    fn test_execution_order_numbering_is_contiguous() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(&config(&dir, NumberingMode::ExecutionOrder))
            .unwrap()
            .with_views(views(false));
        let stats = driver.run(PathBuf::from("ResultIO.csv"), &table()).unwrap();

        assert_eq!(
            file_names(&stats),
            vec!["ResultIO_1.png", "ResultIO_2.png", "ResultIO_3.png"]
        );
    }

    #[test]
    fn test_render_failure_does_not_stop_later_views() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(&config(&dir, NumberingMode::Stable))
            .unwrap()
            .with_views(views(true));
        let stats = driver.run(PathBuf::from("ResultIO.csv"), &table()).unwrap();

        assert_eq!(stats.views_failed, 1);
        assert_eq!(file_names(&stats), vec!["ResultIO_1.png", "ResultIO_4.png"]);
        let failed = stats.views.iter().find(|v| v.status == ViewStatus::Failed).unwrap();
        assert_eq!(failed.id, 3);
        assert!(failed.detail.as_deref().unwrap_or_default().contains("no ink"));
    }

    #[test]
    fn test_write_failure_does_not_stop_later_views() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, NumberingMode::Stable);
        // A directory in place of the third artifact cannot be written as a file
        std::fs::create_dir_all(config.output.dir.join("ResultIO_3.png")).unwrap();

        let driver = Driver::new(&config).unwrap().with_views(views(false));
        let stats = driver.run(PathBuf::from("ResultIO.csv"), &table()).unwrap();

        assert_eq!(stats.views_failed, 1);
        assert_eq!(stats.views_rendered, 2);
        assert_eq!(file_names(&stats), vec!["ResultIO_1.png", "ResultIO_4.png"]);
        assert!(config.output.dir.join("ResultIO_4.png").is_file());

        let failed = stats.views.iter().find(|v| v.status == ViewStatus::Failed).unwrap();
        assert_eq!(failed.id, 3);
    }

    #[test]
    fn test_output_dir_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir, NumberingMode::Stable);
        std::fs::write(dir.path().join("blocked"), b"file").unwrap();
        config.output.dir = dir.path().join("blocked");

        let driver = Driver::new(&config).unwrap().with_views(views(false));
        let err = driver.run(PathBuf::from("ResultIO.csv"), &table()).unwrap_err();
        assert!(matches!(err, Error::WriteError { .. }));
    }
}

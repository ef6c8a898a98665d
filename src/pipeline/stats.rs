//! Run statistics.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Outcome of one view during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// Rendered and written
    Written,
    /// Required columns absent from the table
    Skipped,
    /// Rendering or writing failed
    Failed,
}

/// Per-view entry in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub id: u8,
    pub name: &'static str,
    pub status: ViewStatus,
    /// Written file, when the view produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Missing columns or error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub input: PathBuf,
    pub rows: usize,
    pub views_rendered: usize,
    pub views_skipped: usize,
    pub views_failed: usize,
    /// Written files in execution order
    pub artifacts: Vec<PathBuf>,
    pub views: Vec<ViewReport>,
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
}

impl RunStats {
    pub fn new(input: PathBuf, rows: usize) -> Self {
        Self {
            input,
            rows,
            views_rendered: 0,
            views_skipped: 0,
            views_failed: 0,
            artifacts: Vec::new(),
            views: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Record the outcome of one view and update the counters.
    pub fn record(&mut self, report: ViewReport) {
        match report.status {
            ViewStatus::Written => self.views_rendered += 1,
            ViewStatus::Skipped => self.views_skipped += 1,
            ViewStatus::Failed => self.views_failed += 1,
        }
        if let Some(path) = &report.artifact {
            self.artifacts.push(path.clone());
        }
        self.views.push(report);
    }

    /// Save the run report to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Run report saved to {}", path.display());
        Ok(())
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rows: {} | Rendered: {}, Skipped: {}, Failed: {} | Elapsed: {:.2}s",
            self.rows,
            self.views_rendered,
            self.views_skipped,
            self.views_failed,
            self.elapsed.as_secs_f64()
        )
    }
}

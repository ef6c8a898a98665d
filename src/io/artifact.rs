//! PNG artifact writing.

use crate::error::{Error, Result};
use crate::render::RenderedChart;
use plotters::prelude::BitMapBackend;
use plotters_backend::DrawingBackend;
use std::path::{Path, PathBuf};

/// A rendered chart paired with the file name it is saved under.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub file_name: String,
    pub chart: RenderedChart,
}

impl ChartArtifact {
    pub fn new(stem: &str, number: usize, chart: RenderedChart) -> Self {
        Self {
            file_name: artifact_file_name(stem, number),
            chart,
        }
    }
}

/// `<stem>_<number>.png`
pub fn artifact_file_name(stem: &str, number: usize) -> String {
    format!("{}_{}.png", stem, number)
}

/// Writes chart artifacts as PNG files into one directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::WriteError {
            path: self.dir.clone(),
            message: e.to_string(),
        })
    }

    /// Encode the artifact as PNG, overwriting any existing file.
    ///
    /// Returns the absolute path of the written file.
    pub fn write(&self, artifact: &ChartArtifact) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.dir.join(&artifact.file_name);
        let chart = &artifact.chart;
        let write_error = |message: String| Error::WriteError {
            path: path.clone(),
            message,
        };

        {
            let mut backend = BitMapBackend::new(&path, (chart.width, chart.height));
            backend
                .blit_bitmap((0, 0), (chart.width, chart.height), &chart.pixels)
                .map_err(|e| write_error(e.to_string()))?;
            backend.present().map_err(|e| write_error(e.to_string()))?;
        }

        let absolute = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        println!("Saved plot: {}", absolute.display());
        tracing::debug!(
            "Wrote {}x{} chart to {}",
            chart.width,
            chart.height,
            absolute.display()
        );
        Ok(absolute)
    }
}

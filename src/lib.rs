//! Lock Benchmark Visualization
//!
//! Turns the CSV results of a lock benchmark run into a fixed set of PNG
//! charts comparing lock implementations.
//!
//! # Architecture
//!
//! The pipeline consists of:
//!
//! - **Table**: CSV loading into typed records and derived metrics
//! - **Transform**: Contention melt, group means and box statistics
//! - **Views**: Six independent chart projections gated on column presence
//! - **Render**: Plotters drawing into in-memory bitmaps with an explicit style
//! - **I/O**: PNG artifact writing
//! - **Pipeline**: View sequencing, artifact numbering and run statistics
//!
//! # Usage
//!
//! ```no_run
//! use lockbench_viz::{run_pipeline, Config, RunOutcome};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file(std::path::Path::new("config.yaml"))?;
//!     if let RunOutcome::Completed(stats) = run_pipeline(&config)? {
//!         println!("{}", stats);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod transform;
pub mod views;

pub use config::{Config, NumberingMode};
pub use error::{Error, Result};
pub use io::{ArtifactWriter, ChartArtifact};
pub use pipeline::{Driver, RunOutcome, RunStats};
pub use render::{ChartStyle, RenderedChart, Theme};
pub use table::{derive_metrics, load_table, BenchmarkTable};
pub use views::{all_views, View, ViewId};

/// Run the full chart pipeline with the given configuration.
///
/// A missing input file is not an error: the expected path is reported and
/// [`RunOutcome::InputMissing`] is returned without producing any output.
pub fn run_pipeline(config: &Config) -> Result<RunOutcome> {
    config.validate()?;

    let input = config.input.path();
    tracing::info!("Starting lock benchmark visualization");
    tracing::info!("Reading results from {}", input.display());

    let table = match load_table(&input) {
        Ok(table) => table,
        Err(Error::NotFound(path)) => {
            println!("{}", Error::NotFound(path.clone()));
            return Ok(RunOutcome::InputMissing(path));
        }
        Err(e) => return Err(e),
    };
    tracing::info!("Lock types: {}", table.lock_types().join(", "));

    let table = derive_metrics(table);

    let driver = Driver::new(config)?;
    let stats = driver.run(input, &table)?;

    if let Some(report_path) = &config.report_path {
        if let Err(e) = stats.save_to_file(report_path) {
            tracing::warn!("Failed to save run report to {}: {:#}", report_path.display(), e);
        }
    }

    tracing::info!("Pipeline complete: {}", stats);
    Ok(RunOutcome::Completed(stats))
}

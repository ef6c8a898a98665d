//! Pipeline orchestration: view sequencing, numbering and run statistics.

mod driver;
mod stats;


pub use driver::{Driver, RunOutcome};
pub use stats::{RunStats, ViewReport, ViewStatus};

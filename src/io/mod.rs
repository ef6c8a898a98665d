//! Artifact output.

mod artifact;

pub use artifact::{artifact_file_name, ArtifactWriter, ChartArtifact};

//! Configuration for the chart pipeline.
//!
//! Every field has a default, so running without a config file reproduces the
//! fixed layout: results are read from `Build/ResultIO.csv` and charts are
//! written to `Visualization/`.

use crate::error::{Error, Result};
use crate::render::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the chart pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart styling
    #[serde(default)]
    pub style: StyleConfig,

    /// Optional path to save the run report as JSON
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

/// Input data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the benchmark results
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Results file name inside `base_dir`
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_name: default_file_name(),
        }
    }
}

impl InputConfig {
    /// Full path of the results file.
    pub fn path(&self) -> PathBuf {
        self.base_dir.join(&self.file_name)
    }

    /// File name without extension, used as the artifact prefix.
    pub fn stem(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }
}

/// How artifacts are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingMode {
    /// Suffix is the view's fixed identifier; skipped views leave gaps.
    #[default]
    Stable,

    /// Suffix counts executed views only, so a skipped view shifts the rest.
    ExecutionOrder,
}

impl std::fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberingMode::Stable => write!(f, "stable"),
            NumberingMode::ExecutionOrder => write!(f, "execution_order"),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the PNG files are written to (created if absent)
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File numbering scheme
    #[serde(default)]
    pub numbering: NumberingMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            numbering: NumberingMode::default(),
        }
    }
}

/// Chart style configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Visual palette for backgrounds and grid lines
    #[serde(default)]
    pub theme: Theme,

    /// Pixels per inch
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Figure size in inches [width, height]; overrides each view's own size
    #[serde(default)]
    pub figure_size: Option<[f64; 2]>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            dpi: default_dpi(),
            figure_size: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file.
    /// Format is auto-detected from file extension (.yaml, .yml, or .json).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match ext {
            "json" => serde_json::from_str(&contents)?,
            // YAML is a superset of JSON
            _ => serde_yaml::from_str(&contents)?,
        };
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.input.file_name.trim().is_empty() {
            return Err(Error::Config("input file name must not be empty".into()));
        }
        if self.input.stem().is_none() {
            return Err(Error::Config(format!(
                "input file name '{}' has no usable stem",
                self.input.file_name
            )));
        }
        if !(10..=600).contains(&self.style.dpi) {
            return Err(Error::Config(format!(
                "dpi must be within 10..=600, got {}",
                self.style.dpi
            )));
        }
        if let Some([w, h]) = self.style.figure_size {
            if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
                return Err(Error::Config(format!(
                    "figure size must be positive, got [{}, {}]",
                    w, h
                )));
            }
        }
        Ok(())
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("Build")
}

fn default_file_name() -> String {
    "ResultIO.csv".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Visualization")
}

fn default_dpi() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let config = Config::default();
        assert_eq!(config.input.path(), PathBuf::from("Build/ResultIO.csv"));
        assert_eq!(config.input.stem(), Some("ResultIO"));
        assert_eq!(config.output.dir, PathBuf::from("Visualization"));
        assert_eq!(config.output.numbering, NumberingMode::Stable);
        assert_eq!(config.style.dpi, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml(
            r#"
output:
  numbering: execution_order
style:
  theme: darkgrid
  dpi: 72
"#,
        )
        .unwrap();

        assert_eq!(config.output.numbering, NumberingMode::ExecutionOrder);
        assert_eq!(config.output.dir, PathBuf::from("Visualization"));
        assert_eq!(config.style.theme, Theme::DarkGrid);
        assert_eq!(config.style.dpi, 72);
        assert_eq!(config.input.file_name, "ResultIO.csv");
    }

    #[test]
    fn test_json_config() {
        let config = Config::from_json(
            r#"{"input": {"base_dir": "/data", "file_name": "locks.csv"}, "report_path": "run.json"}"#,
        )
        .unwrap();
        assert_eq!(config.input.path(), PathBuf::from("/data/locks.csv"));
        assert_eq!(config.input.stem(), Some("locks"));
        assert_eq!(config.report_path, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_numbering() {
        let mut config = Config::default();
        config.output.numbering = NumberingMode::ExecutionOrder;
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.output.numbering, NumberingMode::ExecutionOrder);
    }

    #[test]
    fn test_config_validation_invalid() {
        let mut config = Config::default();
        config.style.dpi = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.style.figure_size = Some([12.0, 0.0]);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.file_name = "  ".to_string();
        assert!(config.validate().is_err());
    }
}

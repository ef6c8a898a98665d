//! Lock Benchmark Visualization CLI
//!
//! Renders the charts for a lock benchmark results file.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lockbench_viz::{run_pipeline, Config, NumberingMode, RunOutcome};

#[derive(Parser)]
#[command(name = "lockbench-viz")]
#[command(about = "Render lock benchmark results as PNG charts", long_about = None)]
struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "lockbench-viz.yaml", global = true)]
    config: PathBuf,

    /// Override the results CSV path
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Override the output directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Override artifact numbering
    #[arg(long, value_enum, global = true)]
    numbering: Option<NumberingArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the charts (default if no command specified)
    Run,

    /// Validate configuration
    Validate,

    /// Generate a sample configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "lockbench-viz.yaml")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NumberingArg {
    Stable,
    ExecutionOrder,
}

impl From<NumberingArg> for NumberingMode {
    fn from(arg: NumberingArg) -> Self {
        match arg {
            NumberingArg::Stable => NumberingMode::Stable,
            NumberingArg::ExecutionOrder => NumberingMode::ExecutionOrder,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Run) => {
            let config = load_config(&cli)?;
            run_command(config)?;
        }

        Some(Commands::Validate) => {
            let config = load_config(&cli)?;
            config.validate()?;
            println!("Configuration is valid");
        }

        Some(Commands::GenerateConfig { output }) => {
            generate_config_command(output)?;
        }
    }

    Ok(())
}

/// Load the config file if present, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        tracing::debug!("No config file at {}, using defaults", cli.config.display());
        Config::default()
    };

    if let Some(input) = &cli.input {
        apply_input_override(&mut config, input)?;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(numbering) = cli.numbering {
        config.output.numbering = numbering.into();
    }

    Ok(config)
}

fn apply_input_override(config: &mut Config, input: &Path) -> Result<()> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Input path has no file name: {}", input.display()))?;
    config.input.file_name = file_name.to_string();
    config.input.base_dir = input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(())
}

fn run_command(config: Config) -> Result<()> {
    match run_pipeline(&config)? {
        RunOutcome::InputMissing(path) => {
            tracing::warn!("Nothing to render: {} does not exist", path.display());
        }
        RunOutcome::Completed(stats) => {
            if stats.views_failed > 0 {
                tracing::warn!("{} view(s) failed, see log above", stats.views_failed);
            }
        }
    }
    Ok(())
}

fn generate_config_command(output: PathBuf) -> Result<()> {
    // Generate a commented YAML config
    let yaml = r#"# Lock Benchmark Visualization Configuration

# === INPUT: Benchmark results ===
input:
  # Directory holding the results file
  base_dir: "Build"

  # Results file; its stem prefixes every chart file name
  file_name: "ResultIO.csv"

# === OUTPUT: Where charts are written ===
output:
  # Created if it does not exist
  dir: "Visualization"

  # stable: <stem>_<view id>.png, skipped views leave gaps
  # execution_order: numbers count only the views that ran
  numbering: stable

# === STYLE ===
style:
  # whitegrid | darkgrid | white
  theme: whitegrid

  # Pixels per inch
  dpi: 100

  # Force one figure size in inches for every chart
  # figure_size: [12.0, 6.0]

# Write a JSON summary of the run
# report_path: "Visualization/report.json"
"#;

    std::fs::write(&output, yaml)?;
    println!("Generated sample configuration at: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        // No subcommand - should default to Run
        let cli = Cli::try_parse_from(["lockbench-viz"]);
        assert!(cli.is_ok());
        assert!(cli.unwrap().command.is_none());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["lockbench-viz", "-c", "other.yaml"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::try_parse_from(["lockbench-viz", "validate", "-c", "test.json"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_numbering() {
        let cli = Cli::try_parse_from(["lockbench-viz", "--numbering", "execution-order"]).unwrap();
        assert_eq!(cli.numbering, Some(NumberingArg::ExecutionOrder));

        let bad = Cli::try_parse_from(["lockbench-viz", "--numbering", "sideways"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_overrides_apply_to_defaults() {
        let cli = Cli::try_parse_from([
            "lockbench-viz",
            "-c",
            "does-not-exist.yaml",
            "--input",
            "results/run7.csv",
            "--output-dir",
            "charts",
            "--numbering",
            "execution-order",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.input.path(), PathBuf::from("results/run7.csv"));
        assert_eq!(config.input.stem(), Some("run7"));
        assert_eq!(config.output.dir, PathBuf::from("charts"));
        assert_eq!(config.output.numbering, NumberingMode::ExecutionOrder);
    }

    #[test]
    fn test_generated_config_parses() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.yaml");
        generate_config_command(path.clone()).unwrap();

        let config = Config::from_file(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.input.file_name, "ResultIO.csv");
        assert_eq!(config.output.numbering, NumberingMode::Stable);
    }
}

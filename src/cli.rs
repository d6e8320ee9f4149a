//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Selector;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// emistat - Philippine emigration statistics from the command line
///
/// Browse, rank, chart and edit yearly emigrant counts per dataset
/// (civil status, sex, age, education, occupation, place of origin,
/// destination countries). Markdown/JSON reports.
///
/// Examples:
///   emistat datasets
///   emistat overview --format json
///   emistat table civil-status --from 1990 --to 2000 --page 2
///   emistat rank major-countries --year 2015 --top 5
///   emistat series sex --category female --format json
///   emistat map place-of-origin --geographies regions.txt
///   emistat upload education ./education.xlsx
///   emistat init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .emistat.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Directory holding the collection files
    #[arg(long, value_name = "DIR", env = "EMISTAT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the known datasets
    Datasets,

    /// Record counts and total emigrants for every dataset
    Overview,

    /// Year-filtered, paginated records
    Table {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Page to show (1-based, clamped)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page (overrides config)
        #[arg(long, value_name = "ROWS")]
        page_size: Option<usize>,
    },

    /// Category totals, sorted descending
    Rank {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// A single year, or "total" for every year in range
        #[arg(long, default_value = "total", value_name = "YEAR|total")]
        year: Selector,

        /// Keep only the N largest non-zero categories
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Per-year values for charting, plus yearly totals
    Series {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Single category to project
        #[arg(long, value_name = "KEY")]
        category: Option<String>,
    },

    /// Every dashboard view for one query
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, default_value = "total", value_name = "YEAR|total")]
        year: Selector,

        #[arg(long, value_name = "KEY")]
        category: Option<String>,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long, value_name = "ROWS")]
        page_size: Option<usize>,
    },

    /// Choropleth colors for a geographic dataset
    Map {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, default_value = "total", value_name = "YEAR|total")]
        year: Selector,

        /// File with one geography name per line
        #[arg(long, value_name = "FILE")]
        geographies: Option<PathBuf>,
    },

    /// Create one record
    Add {
        dataset: String,

        #[arg(long)]
        year: i32,

        /// Category values; missing categories are stored as 0
        #[arg(value_name = "KEY=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Replace every field of a record
    Update {
        dataset: String,

        id: String,

        #[arg(long)]
        year: i32,

        #[arg(value_name = "KEY=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Delete a record
    Delete { dataset: String, id: String },

    /// Bulk upload a CSV or XLSX file
    Upload { dataset: String, file: PathBuf },

    /// Generate a default .emistat.toml configuration file
    InitConfig,
}

/// Where a query reads its records.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Dataset name or collection (see `emistat datasets`)
    pub dataset: String,

    /// Aggregate a CSV/XLSX file instead of the store
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Inclusive year bounds.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First year (default: config, then earliest record)
    #[arg(long, value_name = "YEAR")]
    pub from: Option<i32>,

    /// Last year (default: config, then latest record)
    #[arg(long, value_name = "YEAR")]
    pub to: Option<i32>,
}

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            // Out-of-range pages are clamped by the paginator
            Command::Table { page_size, .. } | Command::Summary { page_size, .. } => {
                if *page_size == Some(0) {
                    return Err("Page size must be at least 1".to_string());
                }
            }
            Command::Upload { file, .. } => {
                if !file.exists() {
                    return Err(format!("Upload file does not exist: {}", file.display()));
                }
            }
            _ => {}
        }

        if let Some(source) = self.command.source() {
            if let Some(ref file) = source.file {
                if !file.is_file() {
                    return Err(format!("Input file does not exist: {}", file.display()));
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl Command {
    /// Record source of a query command.
    pub fn source(&self) -> Option<&SourceArgs> {
        match self {
            Command::Table { source, .. }
            | Command::Rank { source, .. }
            | Command::Series { source, .. }
            | Command::Summary { source, .. }
            | Command::Map { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            command,
            config: None,
            verbose: false,
            quiet: false,
            format: None,
            output: None,
            data_dir: None,
        }
    }

    #[test]
    fn test_parse_rank_command() {
        let args = Args::try_parse_from([
            "emistat",
            "rank",
            "major-countries",
            "--year",
            "2015",
            "--top",
            "5",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.format, Some(OutputFormat::Json));
        match args.command {
            Command::Rank {
                source, year, top, ..
            } => {
                assert_eq!(source.dataset, "major-countries");
                assert_eq!(year, Selector::Year(2015));
                assert_eq!(top, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_assignments() {
        let args = Args::try_parse_from([
            "emistat", "add", "sex", "--year", "2021", "male=10", "female=12",
        ])
        .unwrap();

        match args.command {
            Command::Add { year, values, .. } => {
                assert_eq!(year, 2021);
                assert_eq!(
                    values,
                    vec![
                        ("male".to_string(), "10".to_string()),
                        ("female".to_string(), "12".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_overview_command() {
        let args = Args::try_parse_from(["emistat", "overview", "-o", "overview.md"]).unwrap();
        assert!(matches!(args.command, Command::Overview));
        assert!(args.command.source().is_none());
        assert_eq!(args.output, Some(PathBuf::from("overview.md")));
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("male").is_err());
        assert!(parse_assignment("=5").is_err());
        assert_eq!(
            parse_assignment("notReported = 3").unwrap(),
            ("notReported".to_string(), "3".to_string())
        );
    }

    #[test]
    fn test_invalid_selector_rejected() {
        assert!(Args::try_parse_from(["emistat", "rank", "sex", "--year", "latest"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::Datasets);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_page_zero_is_clamped_later() {
        let table = |page, page_size| {
            make_args(Command::Table {
                source: SourceArgs {
                    dataset: "sex".to_string(),
                    file: None,
                },
                range: RangeArgs::default(),
                page,
                page_size,
            })
        };
        assert!(table(0, None).validate().is_ok());
        assert!(table(1, Some(0)).validate().is_err());
    }

    #[test]
    fn test_validation_missing_input_file() {
        let args = make_args(Command::Series {
            source: SourceArgs {
                dataset: "sex".to_string(),
                file: Some(PathBuf::from("does/not/exist.xlsx")),
            },
            range: RangeArgs::default(),
            category: None,
        });
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::Datasets);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

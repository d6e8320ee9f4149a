//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.emistat.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::geo::{Palette, Rgb};
use crate::schema::CategorySchema;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".emistat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Table pagination.
    #[serde(default)]
    pub table: TableConfig,

    /// Default year bounds for queries.
    #[serde(default)]
    pub range: RangeConfig,

    /// Bulk upload settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Choropleth colors.
    #[serde(default)]
    pub map: MapConfig,

    /// Extra dataset schemas on top of the built-in catalog.
    #[serde(default)]
    pub datasets: Vec<CategorySchema>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding one JSON file per collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            format: OutputFormat::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("emistat-data")
}

/// Table pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Rows per page for wide schemas such as all countries.
    #[serde(default = "default_wide_page_size")]
    pub wide_page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            wide_page_size: default_wide_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_wide_page_size() -> usize {
    5
}

/// Default year bounds. Missing bounds fall back to the dataset's
/// observed min/max year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeConfig {
    #[serde(default)]
    pub from: Option<i32>,

    #[serde(default)]
    pub to: Option<i32>,
}

/// Bulk upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Records committed per chunk.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Show a progress bar while uploading.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            show_progress: true,
        }
    }
}

fn default_batch_size() -> usize {
    400
}

fn default_true() -> bool {
    true
}

/// Choropleth color settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_low_color")]
    pub low_color: String,

    #[serde(default = "default_high_color")]
    pub high_color: String,

    /// Fill for unmapped geographies and zero values.
    #[serde(default = "default_no_data_color")]
    pub no_data_color: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            low_color: default_low_color(),
            high_color: default_high_color(),
            no_data_color: default_no_data_color(),
        }
    }
}

impl MapConfig {
    pub fn palette(&self) -> Palette {
        Palette {
            low: self.low_color.clone(),
            high: self.high_color.clone(),
            no_data: self.no_data_color.clone(),
        }
    }
}

fn default_low_color() -> String {
    "#E0F2F7".to_string()
}

fn default_high_color() -> String {
    "#056976".to_string()
}

fn default_no_data_color() -> String {
    "#EEEEEE".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only explicit CLI values override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data_dir) = args.data_dir {
            self.general.data_dir = data_dir.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
    }

    /// Check value ranges and color syntax.
    pub fn validate(&self) -> Result<()> {
        if self.table.page_size == 0 || self.table.wide_page_size == 0 {
            bail!("Table page sizes must be at least 1");
        }
        if self.upload.batch_size == 0 {
            bail!("Upload batch size must be at least 1");
        }

        for color in [
            &self.map.low_color,
            &self.map.high_color,
            &self.map.no_data_color,
        ] {
            Rgb::parse(color).context("Invalid [map] color")?;
        }

        for schema in &self.datasets {
            schema
                .validate()
                .with_context(|| format!("Invalid dataset '{}' in config", schema.name))?;
        }

        Ok(())
    }

    /// Page size for a schema.
    pub fn page_size_for(&self, schema: &CategorySchema) -> usize {
        if schema.wide {
            self.table.wide_page_size
        } else {
            self.table.page_size
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

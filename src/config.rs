//! Configuration management for choropleth.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::BinType;
use crate::error::{ChoroplethError, Result};
use crate::legend::{LegendFormat, LegendOrientation};

/// Command-line arguments for choropleth
#[derive(Parser, Debug, Default)]
#[command(name = "choropleth")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "CHOROPLETH_CONFIG")]
    pub config: Option<PathBuf>,

    /// GeoJSON FeatureCollection with the boundaries
    #[arg(long, env = "CHOROPLETH_BOUNDARIES")]
    pub boundaries: Option<PathBuf>,

    /// Statistics table: a `.csv` export or a JSON array of records
    #[arg(long, env = "CHOROPLETH_TABLE")]
    pub table: Option<PathBuf>,

    /// Boundary property (or comma-separated properties) to join on
    #[arg(long, value_delimiter = ',')]
    pub shape_key: Vec<String>,

    /// Table column (or comma-separated columns) to join on
    #[arg(long, value_delimiter = ',')]
    pub data_key: Vec<String>,

    /// Table column to classify and map
    #[arg(long)]
    pub data_column: Option<String>,

    /// Left-pad join keys with zeros to this width
    #[arg(long)]
    pub key_width: Option<usize>,

    /// Map only the first N rows (0 = all)
    #[arg(long)]
    pub rows_to_map: Option<usize>,

    /// Number of color bins
    #[arg(short, long, env = "CHOROPLETH_BIN_COUNT")]
    pub bin_count: Option<usize>,

    /// Bin strategy (percentiles, equal_width)
    #[arg(long, env = "CHOROPLETH_BIN_TYPE")]
    pub bin_type: Option<String>,

    /// Palette name (e.g. Blues, RdYlGn)
    #[arg(short, long, env = "CHOROPLETH_PALETTE")]
    pub palette: Option<String>,

    /// JSON palette catalog replacing the built-in ColorBrewer schemes
    #[arg(long, env = "CHOROPLETH_PALETTE_FILE")]
    pub palette_file: Option<PathBuf>,

    /// Decimal places for classification and labels
    #[arg(short, long)]
    pub decimals: Option<u32>,

    /// Factor applied to every value before rounding and binning
    #[arg(long)]
    pub multiply_by: Option<f64>,

    /// Name used for the output files
    #[arg(short = 'n', long)]
    pub map_name: Option<String>,

    /// Directory for the HTML map
    #[arg(short, long, env = "CHOROPLETH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for exported legends
    #[arg(long)]
    pub legend_dir: Option<PathBuf>,

    /// Legend caption
    #[arg(long)]
    pub title: Option<String>,

    /// Tooltip label for the value
    #[arg(long)]
    pub popup_label: Option<String>,

    /// Tooltip label for the feature name
    #[arg(long)]
    pub feature_label: Option<String>,

    /// Tile URL template
    #[arg(long)]
    pub tiles: Option<String>,

    /// Legend layout (inline, vertical)
    #[arg(long)]
    pub legend_orientation: Option<String>,

    /// Exported legend format (svg, png)
    #[arg(long)]
    pub legend_format: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHOROPLETH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Input data configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// GeoJSON boundaries
    #[serde(default)]
    pub boundaries_path: Option<PathBuf>,

    /// Statistics table (`.csv` or JSON records)
    #[serde(default)]
    pub table_path: Option<PathBuf>,

    /// Boundary properties forming the join key
    #[serde(default)]
    pub shape_keys: Vec<String>,

    /// Table columns forming the join key
    #[serde(default)]
    pub data_keys: Vec<String>,

    /// Column to classify
    #[serde(default)]
    pub data_column: String,

    /// Zero-pad width for join keys
    #[serde(default)]
    pub key_width: Option<usize>,
}

/// Binning and color configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Number of bins
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,

    /// Bin strategy name
    #[serde(default = "default_bin_type")]
    pub bin_type: String,

    /// Palette name in the catalog
    #[serde(default = "default_palette")]
    pub palette_name: String,

    /// Decimal places used for rounding before binning and for labels
    #[serde(default = "default_decimal_precision")]
    pub decimal_precision: u32,

    /// Scale factor applied before rounding
    #[serde(default = "default_multiply")]
    pub multiply_before_classify: f64,

    /// Only the first N rows are mapped (0 = all)
    #[serde(default)]
    pub rows_to_map: usize,
}

/// Map output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Base name of the output files
    #[serde(default = "default_map_name")]
    pub map_name: String,

    /// Directory for `{map_name}.html`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory for `{map_name}_legend.<ext>`
    #[serde(default = "default_output_dir")]
    pub legend_dir: PathBuf,

    /// Legend caption
    #[serde(default = "default_label")]
    pub title: String,

    /// Tooltip label for the value
    #[serde(default = "default_label")]
    pub popup_label: String,

    /// Tooltip label for the feature name
    #[serde(default = "default_feature_label")]
    pub feature_label: String,

    /// Tile URL template
    #[serde(default = "default_tiles")]
    pub tiles: String,

    /// Tile attribution text
    #[serde(default = "default_attribution")]
    pub attribution: String,

    /// Initial map center as `[lat, lon]`
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Legend layout name
    #[serde(default = "default_orientation")]
    pub legend_orientation: String,

    /// Exported legend format name
    #[serde(default = "default_legend_format")]
    pub legend_format: String,

    /// Fill opacity of the shapes
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Classification configuration
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Map output configuration
    #[serde(default)]
    pub map: MapConfig,

    /// Optional palette catalog file
    #[serde(default)]
    pub palette_file: Option<PathBuf>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults, replaced wholesale by a JSON file if provided
        let mut config = match &args.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Config::default(),
        };

        config.apply_args(args);
        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChoroplethError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override fields with the arguments that were given
    fn apply_args(&mut self, args: Args) {
        let data = &mut self.data;
        if args.boundaries.is_some() {
            data.boundaries_path = args.boundaries;
        }
        if args.table.is_some() {
            data.table_path = args.table;
        }
        if !args.shape_key.is_empty() {
            data.shape_keys = args.shape_key;
        }
        if !args.data_key.is_empty() {
            data.data_keys = args.data_key;
        }
        if let Some(column) = args.data_column {
            data.data_column = column;
        }
        if args.key_width.is_some() {
            data.key_width = args.key_width;
        }

        let classification = &mut self.classification;
        if let Some(rows) = args.rows_to_map {
            classification.rows_to_map = rows;
        }
        if let Some(bin_count) = args.bin_count {
            classification.bin_count = bin_count;
        }
        if let Some(bin_type) = args.bin_type {
            classification.bin_type = bin_type;
        }
        if let Some(palette) = args.palette {
            classification.palette_name = palette;
        }
        if let Some(decimals) = args.decimals {
            classification.decimal_precision = decimals;
        }
        if let Some(factor) = args.multiply_by {
            classification.multiply_before_classify = factor;
        }

        let map = &mut self.map;
        if let Some(name) = args.map_name {
            map.map_name = name;
        }
        if let Some(dir) = args.output_dir {
            map.output_dir = dir;
        }
        if let Some(dir) = args.legend_dir {
            map.legend_dir = dir;
        }
        if let Some(title) = args.title {
            map.title = title;
        }
        if let Some(label) = args.popup_label {
            map.popup_label = label;
        }
        if let Some(label) = args.feature_label {
            map.feature_label = label;
        }
        if let Some(tiles) = args.tiles {
            map.tiles = tiles;
        }
        if let Some(orientation) = args.legend_orientation {
            map.legend_orientation = orientation;
        }
        if let Some(format) = args.legend_format {
            map.legend_format = format;
        }

        if args.palette_file.is_some() {
            self.palette_file = args.palette_file;
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ChoroplethError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.data.validate()?;
        self.classification.validate()?;
        self.map.validate()?;
        Ok(())
    }
}

impl DataConfig {
    /// Check that inputs and join keys are configured
    pub fn validate(&self) -> Result<()> {
        if self.boundaries_path.is_none() {
            return Err(ChoroplethError::Config {
                message: "No boundary file given (--boundaries)".to_string(),
            });
        }
        if self.table_path.is_none() {
            return Err(ChoroplethError::Config {
                message: "No data table given (--table)".to_string(),
            });
        }
        if self.shape_keys.is_empty() || self.shape_keys.len() != self.data_keys.len() {
            return Err(ChoroplethError::Config {
                message: format!(
                    "Join keys must be given in pairs: {} shape key(s), {} data key(s)",
                    self.shape_keys.len(),
                    self.data_keys.len()
                ),
            });
        }
        if self.data_column.trim().is_empty() {
            return Err(ChoroplethError::Config {
                message: "No data column given (--data-column)".to_string(),
            });
        }
        Ok(())
    }
}

impl ClassificationConfig {
    /// The configured bin strategy
    pub fn bin_type(&self) -> Result<BinType> {
        self.bin_type.parse()
    }

    /// Check bin count, strategy and scale factor
    pub fn validate(&self) -> Result<()> {
        if self.bin_count < 2 {
            return Err(ChoroplethError::Config {
                message: format!("bin_count must be at least 2, got {}", self.bin_count),
            });
        }
        self.bin_type()?;
        if self.palette_name.trim().is_empty() {
            return Err(ChoroplethError::Config {
                message: "palette_name cannot be empty".to_string(),
            });
        }
        // A negative factor would flip the order of the bins
        if !self.multiply_before_classify.is_finite() || self.multiply_before_classify <= 0.0 {
            return Err(ChoroplethError::Config {
                message: format!(
                    "multiply_before_classify must be a finite positive number, got {}",
                    self.multiply_before_classify
                ),
            });
        }
        Ok(())
    }
}

impl MapConfig {
    /// The configured legend layout
    pub fn legend_orientation(&self) -> Result<LegendOrientation> {
        self.legend_orientation.parse()
    }

    /// The configured legend file format
    pub fn legend_format(&self) -> Result<LegendFormat> {
        self.legend_format.parse()
    }

    /// Check names, view and legend options
    pub fn validate(&self) -> Result<()> {
        if self.map_name.trim().is_empty() {
            return Err(ChoroplethError::Config {
                message: "map_name cannot be empty".to_string(),
            });
        }
        if self.map_name.contains(['/', '\\']) {
            return Err(ChoroplethError::Config {
                message: format!("map_name cannot contain path separators: {}", self.map_name),
            });
        }
        let [lat, lon] = self.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ChoroplethError::Config {
                message: format!("Invalid map center: [{}, {}]", lat, lon),
            });
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(ChoroplethError::Config {
                message: format!("fill_opacity must be within 0..=1, got {}", self.fill_opacity),
            });
        }
        self.legend_orientation()?;
        self.legend_format()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            classification: ClassificationConfig::default(),
            map: MapConfig::default(),
            palette_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            boundaries_path: None,
            table_path: None,
            shape_keys: Vec::new(),
            data_keys: Vec::new(),
            data_column: String::new(),
            key_width: None,
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            bin_type: default_bin_type(),
            palette_name: default_palette(),
            decimal_precision: default_decimal_precision(),
            multiply_before_classify: default_multiply(),
            rows_to_map: 0,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_name: default_map_name(),
            output_dir: default_output_dir(),
            legend_dir: default_output_dir(),
            title: default_label(),
            popup_label: default_label(),
            feature_label: default_feature_label(),
            tiles: default_tiles(),
            attribution: default_attribution(),
            center: default_center(),
            zoom: default_zoom(),
            legend_orientation: default_orientation(),
            legend_format: default_legend_format(),
            fill_opacity: default_fill_opacity(),
        }
    }
}

// Default value functions for serde
fn default_bin_count() -> usize {
    8
}

fn default_bin_type() -> String {
    "percentiles".to_string()
}

fn default_palette() -> String {
    "Blues".to_string()
}

fn default_decimal_precision() -> u32 {
    4
}

fn default_multiply() -> f64 {
    1.0
}

fn default_map_name() -> String {
    "map".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_label() -> String {
    "Value".to_string()
}

fn default_feature_label() -> String {
    "Feature".to_string()
}

fn default_tiles() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_attribution() -> String {
    "&copy; OpenStreetMap contributors".to_string()
}

fn default_center() -> [f64; 2] {
    [38.7, -95.0]
}

fn default_zoom() -> u8 {
    6
}

fn default_orientation() -> String {
    "inline".to_string()
}

fn default_legend_format() -> String {
    "svg".to_string()
}

fn default_fill_opacity() -> f64 {
    0.75
}

fn default_log_level() -> String {
    "info".to_string()
}

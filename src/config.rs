//! Tool configuration module.
//!
//! Handles loading, validating, and merging `imagetool.toml` files.
//! Configuration is layered: stock defaults are overridden by a config file,
//! which is in turn overridden by command-line flags.
//!
//! ## Config File Location
//!
//! `--config <path>` names the file explicitly. Without it, `imagetool.toml`
//! in the current directory is used when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! unit = "px"               # "px" or "cm"
//! # width = 512             # Defaults to 512 (px) or 5.0 (cm)
//! # height = 512
//! dpi = 300                 # Only used with unit = "cm"
//! square = false            # Lock height to width
//! shape = "rectangle"       # "rectangle", "circle" or "ellipse"
//! max_kb = 999              # Per-image size budget
//!
//! [selection]
//! range = ""                # e.g. "1-3,5"; empty selects everything
//! fallback_by_order = true  # Number files without digits after the highest
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [output]
//! shape = "circle"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Shape, Unit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "imagetool.toml";

const DEFAULT_PX_LENGTH: f64 = 512.0;
const DEFAULT_CM_LENGTH: f64 = 5.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `imagetool.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Target size, shape, and size budget.
    pub output: OutputConfig,
    /// Which files of a batch get processed.
    pub selection: SelectionConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = &self.output;
        for (key, value) in [("width", output.width), ("height", output.height)] {
            match value {
                Some(v) if !(v.is_finite() && v > 0.0) => {
                    return Err(ConfigError::Validation(format!(
                        "output.{key} must be a positive number"
                    )));
                }
                _ => {}
            }
        }
        if output.dpi == 0 {
            return Err(ConfigError::Validation("output.dpi must be at least 1".into()));
        }
        if output.max_kb == 0 {
            return Err(ConfigError::Validation(
                "output.max_kb must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Unit of `width` and `height`.
    pub unit: Unit,
    /// Target width. When absent, depends on the unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Target height. When absent, depends on the unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Dots per inch for centimeter conversion.
    pub dpi: u32,
    /// Use the width for the height too.
    pub square: bool,
    /// Visible silhouette of the output.
    pub shape: Shape,
    /// Per-image size budget in KB.
    pub max_kb: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            unit: Unit::Px,
            width: None,
            height: None,
            dpi: 300,
            square: false,
            shape: Shape::Rectangle,
            max_kb: 999,
        }
    }
}

impl OutputConfig {
    fn default_length(&self) -> f64 {
        match self.unit {
            Unit::Px => DEFAULT_PX_LENGTH,
            Unit::Cm => DEFAULT_CM_LENGTH,
        }
    }

    pub fn effective_width(&self) -> f64 {
        self.width.unwrap_or_else(|| self.default_length())
    }

    pub fn effective_height(&self) -> f64 {
        self.height.unwrap_or_else(|| self.default_length())
    }
}

/// Selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Range expression over sorted positions.
    pub range: String,
    /// Number files without digits after the highest numbered file instead of
    /// dropping them.
    pub fallback_by_order: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            range: String::new(),
            fallback_by_order: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. The file must exist.
pub fn read_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `imagetool.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `imagetool.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_config_file(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `imagetool.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `imagetool.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imagetool Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override values from this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output images
# ---------------------------------------------------------------------------
[output]
# Unit of width and height: "px" or "cm".
unit = "px"

# Target size. Images are stretched to exactly this size (no cropping).
# Defaults to 512 in px mode and 5.0 in cm mode.
# width = 512
# height = 512

# Dots per inch used to convert centimeters to pixels.
dpi = 300

# Use the width for the height as well.
square = false

# Visible silhouette: "rectangle", "circle" or "ellipse".
# Circle and ellipse are saved as PNG with a transparent background.
shape = "rectangle"

# Per-image size budget in KB. JPEG quality is lowered step by step until
# the output fits; images that still don't fit are kept and reported.
max_kb = 999

# ---------------------------------------------------------------------------
# Selection
# ---------------------------------------------------------------------------
[selection]
# Positions (1-based, after sorting by filename number) to process,
# e.g. "1-3,5", "4-", "-2". Empty selects everything.
range = ""

# Files without a number in their name are numbered after the highest
# numbered file, in upload order. Set to false to skip them.
fallback_by_order = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

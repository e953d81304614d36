//! Normalizer configuration module.
//!
//! Handles loading, validating, and merging `squarefit.toml` files. Stock
//! defaults are the base layer; a user config file overrides any subset of
//! keys; command-line flags override both.
//!
//! ## Config File Location
//!
//! `--config <FILE>` selects a file explicitly. Without it, `squarefit.toml`
//! in the working directory is used when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! target_size = 300         # Edge length of the square output, in pixels
//! quality = 85              # JPEG quality (1-100)
//! rounding = "nearest"      # "nearest" or "truncate" for the scaled long side
//! suffix = "_optimized"     # Appended to the file stem for default output paths
//!
//! [requirements]
//! min_edge = 200            # Smallest acceptable width/height (inclusive)
//! max_edge = 400            # Largest acceptable width/height (inclusive)
//! max_file_size_kb = 50     # Size budget shown in reports (informational)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::operations::MAX_EDGE;
use crate::imaging::{NormalizationRequest, Quality, Rounding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "squarefit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Normalizer configuration loaded from `squarefit.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Square output settings (size, quality, naming).
    pub output: OutputConfig,
    /// Acceptance criteria used by `analyze` and `audit`.
    pub requirements: RequirementsConfig,
}

impl NormalizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.output.target_size == 0 || self.output.target_size > MAX_EDGE {
            return Err(ConfigError::Validation(format!(
                "output.target_size must be 1-{MAX_EDGE}"
            )));
        }
        if self.output.suffix.is_empty() {
            return Err(ConfigError::Validation(
                "output.suffix must not be empty".into(),
            ));
        }
        if self.requirements.min_edge > self.requirements.max_edge {
            return Err(ConfigError::Validation(
                "requirements.min_edge must not exceed requirements.max_edge".into(),
            ));
        }
        Ok(())
    }

    /// Inclusive `(min, max)` edge range.
    pub fn range(&self) -> (u32, u32) {
        (self.requirements.min_edge, self.requirements.max_edge)
    }

    /// Size budget in bytes.
    pub fn max_file_bytes(&self) -> u64 {
        self.requirements.max_file_size_kb * 1024
    }

    /// Build a normalize request carrying this config's output settings.
    pub fn request(
        &self,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> NormalizationRequest {
        NormalizationRequest::new(source, destination)
            .with_target_size(self.output.target_size)
            .with_quality(Quality::new(self.output.quality))
            .with_rounding(self.output.rounding)
    }
}

/// Square output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Edge length of the square output, in pixels.
    pub target_size: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Rounding of the scaled long side before cropping.
    pub rounding: Rounding,
    /// Appended to the source stem to name default outputs.
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            target_size: 300,
            quality: 85,
            rounding: Rounding::Nearest,
            suffix: "_optimized".to_string(),
        }
    }
}

/// Acceptance criteria for existing images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequirementsConfig {
    /// Smallest acceptable width and height (inclusive).
    pub min_edge: u32,
    /// Largest acceptable width and height (inclusive).
    pub max_edge: u32,
    /// Size budget shown in reports. Exceeding it is not an error.
    pub max_file_size_kb: u64,
}

impl Default for RequirementsConfig {
    fn default() -> Self {
        Self {
            min_edge: 200,
            max_edge: 400,
            max_file_size_kb: 50,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(NormalizerConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<NormalizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NormalizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file, falling back to stock defaults when it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<NormalizerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Resolve the config for a CLI run.
///
/// An explicit path must exist; the implicit `squarefit.toml` in `cwd` is
/// optional.
pub fn discover_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<NormalizerConfig, ConfigError> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            load_config(path)
        }
        None => load_config(&cwd.join(DEFAULT_CONFIG_FILE)),
    }
}

/// Returns a fully-commented stock `squarefit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# squarefit configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--size, --quality, --rounding) override these values.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Square output
# ---------------------------------------------------------------------------
[output]
# Edge length of the square output image, in pixels.
target_size = 300

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# Rounding of the long side when scaling the short side to target_size.
#   "nearest"  - round to the nearest pixel
#   "truncate" - drop the fraction (may shift the crop by one pixel)
rounding = "nearest"

# Appended to the source file stem when no output path is given:
#   photo.jpg -> photo_optimized.jpg
suffix = "_optimized"

# ---------------------------------------------------------------------------
# Requirements checked by `analyze` and `audit`
# ---------------------------------------------------------------------------
[requirements]
# Inclusive range for both width and height.
min_edge = 200
max_edge = 400

# File size budget in KiB. Reported only; never fails a run.
max_file_size_kb = 50
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = NormalizerConfig::default();
        assert_eq!(config.output.target_size, 300);
        assert_eq!(config.output.quality, 85);
        assert_eq!(config.output.rounding, Rounding::Nearest);
        assert_eq!(config.output.suffix, "_optimized");
        assert_eq!(config.range(), (200, 400));
        assert_eq!(config.max_file_bytes(), 50 * 1024);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[output]
quality = 70
"#;
        let config: NormalizerConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.output.quality, 70);
        // Default values preserved
        assert_eq!(config.output.target_size, 300);
        assert_eq!(config.requirements.max_edge, 400);
    }

    #[test]
    fn parse_rounding_variants() {
        let config: NormalizerConfig = toml::from_str(
            r#"
[output]
rounding = "truncate"
"#,
        )
        .unwrap();
        assert_eq!(config.output.rounding, Rounding::Truncate);

        let bad: Result<NormalizerConfig, _> = toml::from_str(
            r#"
[output]
rounding = "ceil"
"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn request_carries_output_settings() {
        let mut config = NormalizerConfig::default();
        config.output.target_size = 256;
        config.output.quality = 92;
        config.output.rounding = Rounding::Truncate;

        let request = config.request("/in.jpg", "/out.jpg");
        assert_eq!(request.target_size, 256);
        assert_eq!(request.quality.value(), 92);
        assert_eq!(request.rounding, Rounding::Truncate);
        assert_eq!(request.source, PathBuf::from("/in.jpg"));
        assert_eq!(request.destination, PathBuf::from("/out.jpg"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &config_path,
            r#"
[output]
target_size = 240

[requirements]
max_file_size_kb = 80
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.output.target_size, 240);
        assert_eq!(config.requirements.max_file_size_kb, 80);
        // Unspecified values should be defaults
        assert_eq!(config.output.quality, 85);
        assert_eq!(config.requirements.min_edge, 200);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&config_path, "[output\nquality = ").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn discover_uses_cwd_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DEFAULT_CONFIG_FILE),
            "[output]\nquality = 60\n",
        )
        .unwrap();

        let config = discover_config(None, tmp.path()).unwrap();
        assert_eq!(config.output.quality, 60);
    }

    #[test]
    fn discover_without_any_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = discover_config(None, tmp.path()).unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }

    #[test]
    fn discover_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover_config(Some(&tmp.path().join("nope.toml")), tmp.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 85"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[output]
target_size = 300
quality = 85
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[output]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let output = merged.get("output").unwrap();
        assert_eq!(output.get("quality").unwrap().as_integer(), Some(70));
        // target_size preserved from base
        assert_eq!(output.get("target_size").unwrap().as_integer(), Some(300));
    }

    #[test]
    fn merge_toml_adds_new_sections() {
        let base: toml::Value = toml::from_str("[output]\nquality = 85\n").unwrap();
        let overlay: toml::Value = toml::from_str("[requirements]\nmin_edge = 100\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert!(merged.get("output").is_some());
        assert_eq!(
            merged
                .get("requirements")
                .unwrap()
                .get("min_edge")
                .unwrap()
                .as_integer(),
            Some(100)
        );
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[output]
qualty = 90
"#;
        let result: Result<NormalizerConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[outputs]
quality = 90
"#;
        let result: Result<NormalizerConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(NormalizerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = NormalizerConfig::default();
        config.output.quality = 100;
        assert!(config.validate().is_ok());
        config.output.quality = 1;
        assert!(config.validate().is_ok());
        config.output.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.output.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_target_size_zero() {
        let mut config = NormalizerConfig::default();
        config.output.target_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_target_size_beyond_jpeg_limit() {
        let mut config = NormalizerConfig::default();
        config.output.target_size = 70_000;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_inverted_range() {
        let mut config = NormalizerConfig::default();
        config.requirements.min_edge = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_suffix() {
        let mut config = NormalizerConfig::default();
        config.output.suffix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[output]
quality = 200
"#,
        )
        .unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: NormalizerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[output]"));
        assert!(content.contains("[requirements]"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("output").is_some());
        assert!(val.get("requirements").is_some());
    }
}

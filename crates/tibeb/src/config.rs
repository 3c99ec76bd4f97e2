use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TibebError};

/// Tunable constants for every pipeline stage.
///
/// `Default` yields the literal values the studio has always used; a config
/// file only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bottom fraction of the photo holding the border band, in (0, 1]
    pub crop_fraction: f64,
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub binarize_threshold: u8,
    pub grid: GridConfig,
    pub classifier: ClassifierConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GridConfig {
    /// Downsample factor; each output cell covers `scale × scale` pixels
    pub scale: u32,
    /// Cells with a mean intensity above this are foreground
    pub threshold: u8,
    pub foreground: char,
    pub background: char,
    /// Trim leading/trailing background glyphs in the textual code
    pub trim: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Contours with an area at or below this (px²) are tagged `none`
    pub min_area: f64,
    /// Polygon approximation tolerance as a fraction of the perimeter
    pub epsilon_factor: f64,
    pub circularity_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal advance per shape
    pub pitch: f64,
    pub margin: f64,
    pub stroke_width: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crop_fraction: 0.2,
            // sigma OpenCV derives for a 5x5 kernel
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            binarize_threshold: 127,
            grid: GridConfig::default(),
            classifier: ClassifierConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            scale: 10,
            threshold: 127,
            foreground: 'X',
            background: ' ',
            trim: true,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_area: 100.0,
            epsilon_factor: 0.04,
            circularity_threshold: 0.7,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pitch: 30.0,
            margin: 20.0,
            stroke_width: 2.0,
        }
    }
}

impl PipelineConfig {
    /// Reject values no stage can work with
    pub fn validate(&self) -> Result<()> {
        validate_fraction(self.crop_fraction)?;
        if !(self.blur_sigma > 0.0) {
            return Err(TibebError::invalid(format!(
                "blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.canny_low > self.canny_high {
            return Err(TibebError::invalid(format!(
                "canny low threshold {} exceeds high threshold {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.grid.scale == 0 {
            return Err(TibebError::invalid("grid scale must be at least 1"));
        }
        if !(self.classifier.epsilon_factor >= 0.0) {
            return Err(TibebError::invalid("epsilon factor must be non-negative"));
        }
        if !(self.layout.pitch > 0.0) {
            return Err(TibebError::invalid("layout pitch must be positive"));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(TibebError::UnsupportedConfigFormat),
        }
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PipelineConfig)
    }
}

pub(crate) fn validate_fraction(fraction: f64) -> Result<()> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(TibebError::invalid(format!(
            "crop fraction must be in (0, 1], got {fraction}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canny_low, 50.0);
        assert_eq!(config.canny_high, 150.0);
        assert_eq!(config.binarize_threshold, 127);
        assert_eq!(config.classifier.min_area, 100.0);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = PipelineConfig::from_toml(
            "crop_fraction = 0.5\n\n[grid]\nscale = 4\n",
        )
        .expect("Should parse partial config");
        assert_eq!(config.crop_fraction, 0.5);
        assert_eq!(config.grid.scale, 4);
        assert_eq!(config.grid.foreground, 'X');
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::default();
        let text = config.to_toml().expect("Should serialize");
        let parsed = PipelineConfig::from_toml(&text).expect("Should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let bad_fraction = PipelineConfig { crop_fraction: 0.0, ..Default::default() };
        assert!(matches!(bad_fraction.validate(), Err(TibebError::InvalidInput(_))));

        let nan_fraction = PipelineConfig { crop_fraction: f64::NAN, ..Default::default() };
        assert!(nan_fraction.validate().is_err());

        let mut zero_scale = PipelineConfig::default();
        zero_scale.grid.scale = 0;
        assert!(zero_scale.validate().is_err());

        let inverted = PipelineConfig { canny_low: 200.0, ..Default::default() };
        assert!(inverted.validate().is_err());

        assert!(PipelineConfig::from_json(r#"{"blur_sigma": 0.0}"#).is_err());
    }

    #[test]
    fn test_unknown_extension() {
        let result = PipelineConfig::from_file("pipeline.yaml");
        assert!(matches!(result, Err(TibebError::UnsupportedConfigFormat)));
    }
}

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConvertError, Result};

/// Command-line arguments parser for converting annotated videos to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root directory containing the source videos
    #[arg(short = 'v', long = "video_root")]
    pub video_root: String,

    /// Root directory containing the keyframe annotation JSON files
    #[arg(short = 'a', long = "annotation_root")]
    pub annotation_root: String,

    /// Output directory for the generated dataset
    #[arg(short = 'o', long = "output_root")]
    pub output_root: String,

    /// Target sampling rate in frames per second
    #[arg(long = "fps", default_value_t = 3.0, value_parser = validate_fps)]
    pub fps: f64,

    /// Largest allowed output image dimension in pixels
    #[arg(long = "max_size", default_value_t = 1024)]
    pub max_size: u32,

    /// Blend neighboring frames into each sampled frame
    #[arg(long = "fusion")]
    pub fusion: bool,

    /// Half-width of the fusion window in seconds
    #[arg(long = "window_seconds", default_value_t = 0.5)]
    pub window_seconds: f64,

    /// Fusion weights, centered on the sampled frame
    #[arg(
        long = "fusion_weights",
        use_value_delimiter = true,
        value_parser = validate_weight,
        default_values_t = [0.25, 0.5, 0.25]
    )]
    pub fusion_weights: Vec<f64>,

    /// JSON config file with a "convert" section; overrides the tuning flags
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Resolve the conversion settings, preferring the config file when given.
    pub fn to_config(&self) -> Result<ConvertConfig> {
        if let Some(path) = &self.config {
            let file = fs::File::open(path)?;
            let config_file: ConfigFile =
                serde_json::from_reader(file).map_err(|e| ConvertError::ConfigLoad {
                    path: path.clone(),
                    source: e,
                })?;
            Ok(config_file.convert)
        } else {
            Ok(ConvertConfig {
                fps: self.fps,
                max_size: self.max_size,
                fusion: FusionConfig {
                    enabled: self.fusion,
                    window_seconds: self.window_seconds,
                    weights: self.fusion_weights.clone(),
                },
            })
        }
    }
}

// Top-level layout of the JSON config file
#[derive(Debug, Deserialize)]
struct ConfigFile {
    convert: ConvertConfig,
}

/// Conversion settings consumed, not owned, by the pipeline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConvertConfig {
    pub fps: f64,
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    #[serde(default)]
    pub fusion: FusionConfig,
}

/// Temporal fusion settings. The weight sequence is indexed symmetrically
/// around its center tap and need not match the number of frames sampled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FusionConfig {
    pub enabled: bool,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,
    #[serde(default = "default_weights")]
    pub weights: Vec<f64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_seconds: default_window_seconds(),
            weights: default_weights(),
        }
    }
}

fn default_max_size() -> u32 {
    1024
}

fn default_window_seconds() -> f64 {
    0.5
}

fn default_weights() -> Vec<f64> {
    vec![0.25, 0.5, 0.25]
}

// Validate that the sampling rate is a positive number
fn validate_fps(s: &str) -> std::result::Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if val > 0.0 => Ok(val),
        _ => Err("FPS must be a positive number".to_string()),
    }
}

// Validate that a fusion weight is a non-negative number
fn validate_weight(s: &str) -> std::result::Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if val >= 0.0 => Ok(val),
        _ => Err("WEIGHT must be a non-negative number".to_string()),
    }
}

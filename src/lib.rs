//! Keyframe video annotation to YOLO dataset converter
//!
//! This library converts sparse keyframe annotations authored on videos into
//! dense per-frame object-detection training data: bounding boxes are
//! interpolated between keyframes at a target sampling rate, frames are
//! extracted (optionally fused with their temporal neighbors), resized, and
//! written out as YOLO-format label files plus images.

pub mod config;
pub mod convert;
pub mod error;
pub mod fusion;
pub mod io;
pub mod labels;
pub mod resize;
pub mod sampler;
pub mod timeline;
pub mod types;
pub mod utils;
pub mod video;

// Re-export commonly used types and functions
pub use config::{Args, ConvertConfig, FusionConfig};
pub use convert::VideoConverter;
pub use error::{ConvertError, Result};
pub use io::{read_annotation, setup_output_directories, write_manifest};
pub use labels::{generate_labels, LabelRegistry};
pub use types::{AnnotatedObject, Annotation, BoundingBox, ConversionStats, OutputDirs, Sample};
pub use video::VideoSource;

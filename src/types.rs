use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// Supported video containers
pub const VIDEO_FORMATS: &[&str] = &["avi", "mkv", "mov", "mp4"];

/// An axis-aligned box with its top-left corner at (`sx`, `sy`), all fields
/// normalized to [0,1] of the frame dimensions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub sx: f64,
    pub sy: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    /// Linear blend toward `other`: `alpha` 0 yields `self`, 1 yields `other`.
    pub fn lerp(&self, other: &BoundingBox, alpha: f64) -> BoundingBox {
        BoundingBox {
            sx: self.sx + alpha * (other.sx - self.sx),
            sy: self.sy + alpha * (other.sy - self.sy),
            w: self.w + alpha * (other.w - self.w),
            h: self.h + alpha * (other.h - self.h),
        }
    }
}

// One annotated object: a label plus keyframed boxes keyed by time-key
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnnotatedObject {
    pub label: String,
    pub timeline: HashMap<String, BoundingBox>,
}

// The annotation file contents for a single video
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Annotation {
    pub objects: Vec<AnnotatedObject>,
}

/// A frame retained by the sampler. `normalized_time` is
/// `frame_index / total_frame_count`, which approximates the elapsed-time
/// fraction and drifts on variable-frame-rate sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub frame_index: u64,
    pub normalized_time: f64,
}

// Struct to hold the paths to the dataset output directories
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Struct to hold conversion statistics across a whole run
#[derive(Debug, Default, Clone)]
pub struct ConversionStats {
    pub videos_converted: usize,
    pub videos_skipped: usize,
    pub videos_failed: usize,
    pub frames_sampled: usize,
    pub frames_written: usize,
    pub frames_skipped_empty: usize,
    pub frame_decode_failures: usize,
    pub frame_write_failures: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Videos converted: {}", self.videos_converted);
        log::info!("Videos skipped (missing annotation): {}", self.videos_skipped);
        log::info!("Videos failed: {}", self.videos_failed);
        log::info!("Frames sampled: {}", self.frames_sampled);
        log::info!("Frames written: {}", self.frames_written);
        log::info!(
            "Frames skipped (no visible object): {}",
            self.frames_skipped_empty
        );

        if self.frame_decode_failures > 0 || self.frame_write_failures > 0 {
            log::warn!(
                "Frame failures: {} decode, {} write",
                self.frame_decode_failures,
                self.frame_write_failures
            );
        }
    }
}

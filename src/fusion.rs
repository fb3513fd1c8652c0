use image::RgbImage;
use log::{error, warn};

use crate::config::FusionConfig;
use crate::resize::bound_to_max;
use crate::video::VideoSource;

/// Candidate frame indices around a sampled frame and their blend weights,
/// renormalized to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionPlan {
    pub indices: Vec<u64>,
    pub weights: Vec<f64>,
}

/// Select the candidate frames and weights for fusing around
/// `current_frame_index`.
///
/// The window spans `floor(window_seconds * target_fps)` frames on each
/// side, clamped to half the video length. Each in-range candidate takes
/// the weight at `center + offset` in the configured sequence; offsets
/// whose weight index falls outside the sequence reuse the nearest edge
/// weight rather than being dropped.
pub fn plan_fusion(
    current_frame_index: u64,
    total_frames: u64,
    target_fps: f64,
    config: &FusionConfig,
) -> FusionPlan {
    let window_frames =
        ((config.window_seconds * target_fps) as i64).min((total_frames / 2) as i64);
    let center = (config.weights.len() / 2) as i64;

    let mut indices = Vec::new();
    let mut weights = Vec::new();
    for offset in -window_frames..=window_frames {
        let frame_index = current_frame_index as i64 + offset;
        if frame_index < 0 || frame_index >= total_frames as i64 {
            continue;
        }
        indices.push(frame_index as u64);

        let weight_index = center + offset;
        let weight = if config.weights.is_empty() {
            1.0
        } else if weight_index < 0 {
            config.weights[0]
        } else if (weight_index as usize) < config.weights.len() {
            config.weights[weight_index as usize]
        } else {
            config.weights[config.weights.len() - 1]
        };
        weights.push(weight);
    }

    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for weight in &mut weights {
            *weight /= sum;
        }
    }

    FusionPlan { indices, weights }
}

/// Composite a weighted temporal average of the frames around
/// `current_frame_index`, reading each candidate through a direct seek.
///
/// Candidates that fail to decode are skipped and the accumulated sum is
/// rescaled by `attempted / read` to approximately restore the missing
/// weight mass. With zero readable candidates the sampled frame alone is
/// read; if that fails too, a constant black `max_size` square is emitted.
/// This function never fails.
pub fn fuse_frame<S: VideoSource>(
    source: &mut S,
    current_frame_index: u64,
    total_frames: u64,
    target_fps: f64,
    config: &FusionConfig,
    max_size: u32,
) -> RgbImage {
    let plan = plan_fusion(current_frame_index, total_frames, target_fps, config);
    let attempted = plan.weights.len();

    let mut sum: Vec<f32> = Vec::new();
    let mut dims: Option<(u32, u32)> = None;
    let mut read = 0usize;
    for (&frame_index, &weight) in plan.indices.iter().zip(plan.weights.iter()) {
        let Some(frame) = read_frame_at(source, frame_index) else {
            warn!("could not read frame {} for fusion", frame_index);
            continue;
        };
        let frame = bound_to_max(frame, max_size);
        let (width, height) = frame.dimensions();
        match dims {
            None => {
                dims = Some((width, height));
                sum = vec![0.0f32; (width * height * 3) as usize];
            }
            Some(d) if d != (width, height) => {
                warn!(
                    "frame {} decoded as {}x{}, mismatching the fusion accumulator",
                    frame_index, width, height
                );
                continue;
            }
            Some(_) => {}
        }
        for (acc, &px) in sum.iter_mut().zip(frame.as_raw().iter()) {
            *acc += px as f32 * weight as f32;
        }
        read += 1;
    }

    if read > 0 {
        if let Some((width, height)) = dims {
            let rescale = attempted as f32 / read as f32;
            let pixels: Vec<u8> = sum
                .iter()
                .map(|v| (v * rescale).clamp(0.0, 255.0) as u8)
                .collect();
            if let Some(fused) = RgbImage::from_vec(width, height, pixels) {
                return fused;
            }
        }
    }

    error!(
        "no frames could be read for fusion around index {}",
        current_frame_index
    );
    if let Some(frame) = read_frame_at(source, current_frame_index) {
        return bound_to_max(frame, max_size);
    }

    error!(
        "could not read frame {} directly, emitting a placeholder",
        current_frame_index
    );
    RgbImage::new(max_size, max_size)
}

fn read_frame_at<S: VideoSource>(source: &mut S, index: u64) -> Option<RgbImage> {
    source.seek(index).ok()?;
    source.read_next_frame().ok().flatten()
}

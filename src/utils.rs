use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::types::VIDEO_FORMATS;

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Collect all video files under the root, sorted for a reproducible
/// conversion order (label ids depend on it).
pub fn find_video_files(video_root: &Path) -> Vec<PathBuf> {
    let mut videos: Vec<PathBuf> = VIDEO_FORMATS
        .iter()
        .flat_map(|ext| {
            let pattern = format!("{}/**/*.{}", video_root.display(), ext);
            glob(&pattern)
                .into_iter()
                .flatten()
                .filter_map(|entry| entry.ok())
                .collect::<Vec<_>>()
        })
        .collect();
    videos.sort();
    videos
}

/// Output stem for a sampled frame: `<video_stem>_<frame_idx:06>`
pub fn frame_stem(video_path: &Path, frame_index: u64) -> String {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    format!("{}_{:06}", sanitize_filename::sanitize(stem), frame_index)
}

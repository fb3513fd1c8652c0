use image::RgbImage;
use jwalk::WalkDir;
use log::{debug, error, info, warn};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::fusion::fuse_frame;
use crate::io::{read_annotation, setup_output_directories, write_manifest};
use crate::labels::{generate_labels, LabelRegistry};
use crate::resize::bound_to_max;
use crate::sampler::FrameSampler;
use crate::types::{Annotation, ConversionStats, OutputDirs, Sample};
use crate::utils::{create_progress_bar, find_video_files, frame_stem};
use crate::video::VideoSource;

/// Drives the conversion of annotated videos into a YOLO dataset.
///
/// Videos are converted one at a time, frames in strictly increasing index
/// order. The label registry is the only state that crosses video
/// boundaries, so id assignment is deterministic in first-appearance order
/// over the whole run.
pub struct VideoConverter<S: VideoSource> {
    video_root: PathBuf,
    annotation_root: PathBuf,
    output_root: PathBuf,
    config: ConvertConfig,
    dirs: OutputDirs,
    registry: LabelRegistry,
    stats: ConversionStats,
    _source: PhantomData<S>,
}

impl<S: VideoSource> VideoConverter<S> {
    pub fn new(
        video_root: impl Into<PathBuf>,
        annotation_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        config: ConvertConfig,
    ) -> Result<Self> {
        let output_root = output_root.into();
        let dirs = setup_output_directories(&output_root)?;
        info!("initialized, output root: {}", output_root.display());
        Ok(Self {
            video_root: video_root.into(),
            annotation_root: annotation_root.into(),
            output_root,
            config,
            dirs,
            registry: LabelRegistry::new(),
            stats: ConversionStats::new(),
            _source: PhantomData,
        })
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn into_registry(self) -> LabelRegistry {
        self.registry
    }

    /// Find the annotation file for a video: first a recursive search under
    /// the annotation root for `<video_filename>.json`, then the `.cache`
    /// subdirectory as a fallback.
    fn find_annotation_file(&self, video_path: &Path) -> Option<PathBuf> {
        let file_name = video_path.file_name()?.to_string_lossy().into_owned();
        let target = format!("{}.json", file_name);

        for entry in WalkDir::new(&self.annotation_root)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name().to_string_lossy() == target {
                debug!("found annotation file: {}", entry.path().display());
                return Some(entry.path());
            }
        }

        let cache_path = self.annotation_root.join(".cache").join(&target);
        if cache_path.exists() {
            debug!("found annotation file in cache: {}", cache_path.display());
            return Some(cache_path);
        }

        None
    }

    /// Convert every video under the video root, then write the manifest.
    pub fn convert_all(&mut self) -> Result<()> {
        let videos = find_video_files(&self.video_root);
        info!("found {} video files", videos.len());

        for video_path in &videos {
            match self.convert_video(video_path) {
                Ok(()) => {}
                Err(ConvertError::MissingAnnotation(path)) => {
                    warn!("no annotation file found for video {}", path.display());
                    self.stats.videos_skipped += 1;
                }
                Err(e) => {
                    error!("failed to convert {}: {}", video_path.display(), e);
                    self.stats.videos_failed += 1;
                }
            }
        }

        info!("writing dataset manifest...");
        write_manifest(&self.output_root, &self.registry)?;
        self.stats.log_summary();
        Ok(())
    }

    /// Convert a single video, appending to the shared label registry.
    pub fn convert_video(&mut self, video_path: &Path) -> Result<()> {
        info!("processing video: {}", video_path.display());

        let annotation_path = self
            .find_annotation_file(video_path)
            .ok_or_else(|| ConvertError::MissingAnnotation(video_path.to_path_buf()))?;
        let annotation = read_annotation(&annotation_path)?;

        let mut source = S::open(video_path)?;
        let total_frames = source.frame_count();
        let sampler = FrameSampler::new(source.fps(), self.config.fps, total_frames);

        // fusion seeks through a second handle so the sequential decode
        // position is left untouched
        let mut seek_source = if self.config.fusion.enabled {
            Some(S::open(video_path)?)
        } else {
            None
        };

        let display_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| video_path.display().to_string());
        let pb = create_progress_bar(total_frames, &display_name);
        let mut frame_index: u64 = 0;
        loop {
            let frame = match source.read_next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    warn!("decode stopped at frame {}: {}", frame_index, e);
                    self.stats.frame_decode_failures += 1;
                    break;
                }
            };
            if let Some(sample) = sampler.sample(frame_index) {
                if let Err(e) = self.process_frame(
                    frame,
                    &sample,
                    video_path,
                    &annotation,
                    seek_source.as_mut(),
                    total_frames,
                ) {
                    warn!("dropped frame {}: {}", frame_index, e);
                    self.stats.frame_write_failures += 1;
                }
            }
            frame_index += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();

        self.stats.videos_converted += 1;
        info!("finished video: {}", video_path.display());
        Ok(())
    }

    /// Handle one sampled frame: produce the output image (fused or raw),
    /// emit its labels, and persist both. Nothing is written for frames
    /// without a single label line.
    fn process_frame(
        &mut self,
        frame: RgbImage,
        sample: &Sample,
        video_path: &Path,
        annotation: &Annotation,
        seek_source: Option<&mut S>,
        total_frames: u64,
    ) -> Result<()> {
        self.stats.frames_sampled += 1;

        let frame = match seek_source {
            Some(seek) => fuse_frame(
                seek,
                sample.frame_index,
                total_frames,
                self.config.fps,
                &self.config.fusion,
                self.config.max_size,
            ),
            None => bound_to_max(frame, self.config.max_size),
        };

        let lines = generate_labels(annotation, sample.normalized_time, &mut self.registry);
        if lines.is_empty() {
            self.stats.frames_skipped_empty += 1;
            return Ok(());
        }

        // plain concatenation: video stems may themselves contain dots
        let name = frame_stem(video_path, sample.frame_index);
        let label_path = self.dirs.labels_dir.join(format!("{}.txt", name));
        fs::write(&label_path, lines.join("\n")).map_err(|e| ConvertError::LabelWrite {
            path: label_path.clone(),
            source: e,
        })?;

        let image_path = self.dirs.images_dir.join(format!("{}.jpg", name));
        frame.save(&image_path).map_err(|e| ConvertError::ImageWrite {
            path: image_path.clone(),
            source: e,
        })?;

        self.stats.frames_written += 1;
        debug!("wrote {}", image_path.display());
        Ok(())
    }
}

use image::RgbImage;
use std::path::Path;

use crate::error::Result;

/// Decoder capability the conversion core requires from its environment.
///
/// Sequential reads drive the sampling loop; `seek` backs the fusion
/// engine's direct frame access. Seek precision is codec-dependent and
/// best-effort.
pub trait VideoSource: Sized {
    fn open(path: &Path) -> Result<Self>;

    /// Native frame rate as reported by the container.
    fn fps(&self) -> f64;

    /// Total frame count as reported by the container.
    fn frame_count(&self) -> u64;

    /// Decode the next frame in sequence, or `None` at end of stream.
    fn read_next_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Position the decoder so the next read returns `index`.
    fn seek(&mut self, index: u64) -> Result<()>;
}

#[cfg(feature = "opencv")]
pub use self::backend::OpencvVideoSource;

#[cfg(feature = "opencv")]
mod backend {
    use image::RgbImage;
    use opencv::core::{AlgorithmHint, Mat};
    use opencv::prelude::*;
    use opencv::{imgproc, videoio};
    use std::path::{Path, PathBuf};

    use super::VideoSource;
    use crate::error::{ConvertError, Result};

    /// OpenCV `VideoCapture` backed decoder.
    pub struct OpencvVideoSource {
        capture: videoio::VideoCapture,
        path: PathBuf,
        pos: u64,
    }

    impl OpencvVideoSource {
        fn decode_error(&self, e: opencv::Error) -> ConvertError {
            ConvertError::FrameDecode {
                index: self.pos,
                reason: format!("{} ({})", e, self.path.display()),
            }
        }
    }

    impl VideoSource for OpencvVideoSource {
        fn open(path: &Path) -> Result<Self> {
            let open_error = |reason: String| ConvertError::VideoOpen {
                path: path.to_path_buf(),
                reason,
            };
            let capture =
                videoio::VideoCapture::from_file(path.to_string_lossy().as_ref(), videoio::CAP_ANY)
                    .map_err(|e| open_error(e.to_string()))?;
            let opened = capture
                .is_opened()
                .map_err(|e| open_error(e.to_string()))?;
            if !opened {
                return Err(open_error("backend could not open the file".to_string()));
            }
            Ok(Self {
                capture,
                path: path.to_path_buf(),
                pos: 0,
            })
        }

        fn fps(&self) -> f64 {
            self.capture.get(videoio::CAP_PROP_FPS).unwrap_or(0.0)
        }

        fn frame_count(&self) -> u64 {
            self.capture
                .get(videoio::CAP_PROP_FRAME_COUNT)
                .unwrap_or(0.0) as u64
        }

        fn read_next_frame(&mut self) -> Result<Option<RgbImage>> {
            let mut bgr = Mat::default();
            let ok = self
                .capture
                .read(&mut bgr)
                .map_err(|e| self.decode_error(e))?;
            if !ok || bgr.empty() {
                return Ok(None);
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color(
                &bgr,
                &mut rgb,
                imgproc::COLOR_BGR2RGB,
                0,
                AlgorithmHint::ALGO_HINT_DEFAULT,
            )
            .map_err(|e| self.decode_error(e))?;

            let width = rgb.cols() as u32;
            let height = rgb.rows() as u32;
            let data = rgb
                .data_bytes()
                .map_err(|e| self.decode_error(e))?
                .to_vec();
            let frame = RgbImage::from_vec(width, height, data).ok_or_else(|| {
                ConvertError::FrameDecode {
                    index: self.pos,
                    reason: format!("{}x{} buffer has unexpected length", width, height),
                }
            })?;

            self.pos += 1;
            Ok(Some(frame))
        }

        fn seek(&mut self, index: u64) -> Result<()> {
            self.capture
                .set(videoio::CAP_PROP_POS_FRAMES, index as f64)
                .map_err(|e| ConvertError::FrameDecode {
                    index,
                    reason: format!("seek failed: {}", e),
                })?;
            self.pos = index;
            Ok(())
        }
    }
}

use std::path::PathBuf;

/// Failure taxonomy for the conversion pipeline.
///
/// Callers decide severity: `MissingAnnotation` skips the video,
/// `FrameDecode` is frame-local inside fusion and ends the decode loop when
/// it hits the primary read, `LabelWrite`/`ImageWrite` drop the affected
/// frame, `ManifestWrite` is fatal at the end of a run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("no annotation file found for video {0}")]
    MissingAnnotation(PathBuf),

    #[error("failed to parse annotation {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load config file {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open video {path}: {reason}")]
    VideoOpen { path: PathBuf, reason: String },

    #[error("failed to decode frame {index}: {reason}")]
    FrameDecode { index: u64, reason: String },

    #[error("failed to write label file {path}: {source}")]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write dataset manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::labels::LabelRegistry;
use crate::types::{Annotation, OutputDirs};

/// Set up the images/ and labels/ directories under the output root.
///
/// Existing directories are reused; a conversion run appends to whatever is
/// already there.
pub fn setup_output_directories(output_root: &Path) -> Result<OutputDirs> {
    let images_dir = output_root.join("images");
    let labels_dir = output_root.join("labels");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&labels_dir)?;
    Ok(OutputDirs {
        images_dir,
        labels_dir,
    })
}

/// Read and parse a single annotation JSON file.
pub fn read_annotation(path: &Path) -> Result<Annotation> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|e| ConvertError::AnnotationParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the dataset manifest: the label registry as a name-index mapping
/// sorted by id ascending.
pub fn write_manifest(output_root: &Path, registry: &LabelRegistry) -> Result<()> {
    let manifest_path = output_root.join("data.yaml");
    let map_err = |e: std::io::Error| ConvertError::ManifestWrite {
        path: manifest_path.clone(),
        source: e,
    };

    let mut manifest = BufWriter::new(File::create(&manifest_path).map_err(map_err)?);
    let mut content = String::from("names:\n");
    for (id, name) in registry.names().iter().enumerate() {
        content.push_str(&format!("  {}: {}\n", id, name));
    }
    manifest.write_all(content.as_bytes()).map_err(map_err)
}

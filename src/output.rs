//! Writing the text grid and the preview image

use crate::error::GridError;
use image::{GrayImage, ImageFormat};
use std::io::Write;
use std::path::Path;

/// Write `text` to `path` through a temporary file in the same directory
/// A failed write never leaves a truncated file at `path`
pub fn write_text(path: &Path, text: &str) -> Result<(), GridError> {
    let write_err = |source: std::io::Error| GridError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::Builder::new()
        .prefix(".img2grid")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;

    temp_file.write_all(text.as_bytes()).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Save the binary grid as an image, format chosen by extension (PNG if unknown)
pub fn save_preview(path: &Path, image: &GrayImage) -> Result<(), GridError> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    image
        .save_with_format(path, format)
        .map_err(|source| GridError::Preview {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("Saved {:?} preview to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_write_text_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");

        write_text(&path, "0 0\n 0 \n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0 0\n 0 \n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should be renamed away");
    }

    #[test]
    fn test_write_text_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        write_text(&path, "new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_write_text_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("grid.txt");

        let err = write_text(&path, "x\n").unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(!path.exists());
    }

    #[test]
    fn test_preview_round_trips_binary_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let img = GrayImage::from_fn(6, 4, |x, _| if x < 3 { Luma([0]) } else { Luma([255]) });

        save_preview(&path, &img).unwrap();

        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded, img);
    }
}

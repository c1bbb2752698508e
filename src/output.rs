//! All-or-nothing output writing.
//!
//! Each output is first written to a hidden sibling file. Only once every
//! file has been written are they renamed into place; on any failure the
//! temporary files are removed and nothing is left behind.

use crate::error::{PixelArtError, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A fully rendered file waiting to be written.
pub struct PendingFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl PendingFile {
    pub fn text(path: &Path, text: String) -> Self {
        Self {
            path: path.to_path_buf(),
            contents: text.into_bytes(),
        }
    }

    /// Encodes `image` in the format implied by the path extension.
    pub fn image(path: &Path, image: &RgbaImage) -> Result<Self> {
        let format = image_format_for(path)?;
        let dynamic = DynamicImage::ImageRgba8(image.clone());
        // JPEG has no alpha channel
        let dynamic = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
            _ => dynamic,
        };

        let mut buffer = Cursor::new(Vec::new());
        dynamic.write_to(&mut buffer, format).map_err(|e| {
            PixelArtError::io_failure(path, std::io::Error::other(e.to_string()))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            contents: buffer.into_inner(),
        })
    }
}

/// Image format for a preview path, rejecting extensions the encoder does not know.
pub fn image_format_for(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path).map_err(|_| {
        PixelArtError::configuration(format!(
            "cannot tell the image format of preview path {} (use .png, .jpg, .bmp, ...)",
            path.display()
        ))
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn remove_staged(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

/// Writes every file or none of them.
pub fn write_all(files: &[PendingFile]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());

    for file in files {
        let tmp = staging_path(&file.path);
        if let Err(e) = fs::write(&tmp, &file.contents) {
            remove_staged(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(PixelArtError::io_failure(&file.path, e));
        }
        debug!("Staged {} bytes at {}", file.contents.len(), tmp.display());
        staged.push((tmp, &file.path));
    }

    for (index, (tmp, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, target) {
            for (_, placed) in &staged[..index] {
                let _ = fs::remove_file(placed);
            }
            remove_staged(&staged[index..]);
            return Err(PixelArtError::io_failure(*target, e));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("art.mcfunction");
        let preview = dir.path().join("art.png");
        let image = RgbaImage::from_pixel(2, 3, Rgba([10, 20, 30, 255]));

        write_all(&[
            PendingFile::text(&script, "setblock 0 0 0 minecraft:red_wool\n".to_string()),
            PendingFile::image(&preview, &image).unwrap(),
        ])
        .unwrap();

        assert_eq!(
            fs::read_to_string(&script).unwrap(),
            "setblock 0 0 0 minecraft:red_wool\n"
        );
        let decoded = image::open(&preview).unwrap().to_rgba8();
        assert_eq!(decoded, image);

        // No staging files left over
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }

    #[test]
    fn test_failure_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("art.mcfunction");
        let missing = dir.path().join("missing").join("art.json");

        let err = write_all(&[
            PendingFile::text(&script, "setblock 0 0 0 minecraft:red_wool\n".to_string()),
            PendingFile::text(&missing, "{}".to_string()),
        ])
        .unwrap_err();

        assert!(matches!(err, PixelArtError::IoFailure { .. }));
        assert!(err.to_string().contains("missing"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_jpeg_preview_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.jpg");
        let image = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        let file = PendingFile::image(&path, &image).unwrap();
        assert!(!file.contents.is_empty());
    }

    #[test]
    fn test_unknown_preview_extension() {
        assert!(matches!(
            image_format_for(Path::new("preview.nope")),
            Err(PixelArtError::ConfigurationError(_))
        ));
        assert_eq!(
            image_format_for(Path::new("preview.PNG")).unwrap(),
            ImageFormat::Png
        );
    }
}

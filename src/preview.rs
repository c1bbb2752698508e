//! Top-down preview of the generated pixel art.
//!
//! One pixel per block, painted with the matched palette colour. Cells skipped
//! as transparent stay fully transparent.

use crate::error::{PixelArtError, Result};
use crate::mapping::MatchGrid;
use crate::palette::Palette;
use image::{Rgba, RgbaImage};

pub fn render_preview(matches: &MatchGrid, palette: &Palette) -> RgbaImage {
    RgbaImage::from_fn(matches.width(), matches.height(), |col, row| {
        match matches.get(col, row).and_then(|index| palette.get(index)) {
            Some(entry) => {
                let (r, g, b) = entry.rgb;
                Rgba([r, g, b, 255])
            }
            None => Rgba([0, 0, 0, 0]),
        }
    })
}

/// Enlarges every block to a `scale` x `scale` square so small grids are easier to see.
pub fn scale_preview(preview: RgbaImage, scale: u32) -> Result<RgbaImage> {
    if scale <= 1 {
        return Ok(preview);
    }
    let (Some(width), Some(height)) = (
        preview.width().checked_mul(scale),
        preview.height().checked_mul(scale),
    ) else {
        return Err(PixelArtError::configuration(format!(
            "--preview-scale {scale} makes a {}x{} preview too large",
            preview.width(),
            preview.height()
        )));
    };
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        *preview.get_pixel(x / scale, y / scale)
    }))
}

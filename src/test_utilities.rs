use crate::colors::RGBTuple;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Builds an opaque image from row-major pixels.
pub fn rgb_image(width: u32, height: u32, pixels: &[RGBTuple]) -> DynamicImage {
    assert_eq!(pixels.len(), (width * height) as usize);
    let img = RgbImage::from_fn(width, height, |x, y| {
        let (r, g, b) = pixels[(y * width + x) as usize];
        Rgb([r, g, b])
    });
    DynamicImage::ImageRgb8(img)
}

/// Builds an image with an alpha channel from row-major pixels.
pub fn rgba_image(width: u32, height: u32, pixels: &[(u8, u8, u8, u8)]) -> DynamicImage {
    assert_eq!(pixels.len(), (width * height) as usize);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let (r, g, b, a) = pixels[(y * width + x) as usize];
        Rgba([r, g, b, a])
    });
    DynamicImage::ImageRgba8(img)
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes.into_inner()
}

/// The 2x2 red/green/blue/white example image.
pub fn primaries_image() -> DynamicImage {
    rgb_image(
        2,
        2,
        &[(255, 0, 0), (0, 255, 0), (0, 0, 255), (255, 255, 255)],
    )
}

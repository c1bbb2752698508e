//! Scales the source image down (or up) to one sample per output block.
//!
//! The default filter is an exact area average: every output cell is the
//! coverage-weighted mean of the source pixels underneath it, computed with
//! integer weights so the result does not depend on float summation order.
//! The remaining filters delegate to `image::imageops::resize`.

use crate::colors::{composite_over, RGBTuple};
use crate::error::{PixelArtError, Result};
use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::debug;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ResampleFilter {
    /// Coverage-weighted box average
    #[default]
    Area,
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    fn filter_type(self) -> Option<FilterType> {
        match self {
            ResampleFilter::Area => None,
            ResampleFilter::Nearest => Some(FilterType::Nearest),
            ResampleFilter::Triangle => Some(FilterType::Triangle),
            ResampleFilter::CatmullRom => Some(FilterType::CatmullRom),
            ResampleFilter::Gaussian => Some(FilterType::Gaussian),
            ResampleFilter::Lanczos3 => Some(FilterType::Lanczos3),
        }
    }
}

/// How source transparency is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransparencyPolicy {
    /// Blend every pixel over `background` before resampling; all cells become opaque.
    Composite { background: RGBTuple },
    /// Keep alpha through resampling; cells below `threshold` get no block.
    Skip { threshold: u8 },
}

impl Default for TransparencyPolicy {
    fn default() -> Self {
        TransparencyPolicy::Composite {
            background: (255, 255, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub rgb: RGBTuple,
    pub alpha: u8,
}

impl Sample {
    pub fn opaque(rgb: RGBTuple) -> Self {
        Self { rgb, alpha: 255 }
    }
}

/// Row-major grid of samples, one per output block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    samples: Vec<Sample>,
}

impl SampleGrid {
    pub fn new(width: u32, height: u32, samples: Vec<Sample>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixelArtError::invalid_input(format!(
                "sample grid must not be empty, got {width}x{height}"
            )));
        }
        if samples.len() != width as usize * height as usize {
            return Err(PixelArtError::invalid_input(format!(
                "expected {} samples for a {width}x{height} grid, got {}",
                width as usize * height as usize,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, col: u32, row: u32) -> Option<&Sample> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.samples
            .get(row as usize * self.width as usize + col as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Sample]> + '_ {
        self.samples.chunks(self.width as usize)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Reads and decodes an image file.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path).map_err(|e| {
        PixelArtError::invalid_input(format!("cannot decode image {}: {e}", path.display()))
    })?;
    ensure_not_empty(&image)?;
    Ok(image)
}

/// Decodes an in-memory encoded image (format guessed from its header).
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| PixelArtError::invalid_input(format!("cannot decode image: {e}")))?;
    ensure_not_empty(&image)?;
    Ok(image)
}

fn ensure_not_empty(image: &DynamicImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PixelArtError::invalid_input(format!(
            "image has zero size ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Block-grid height that keeps the source aspect ratio: `round(W * H0 / W0)`,
/// rounding halves up, never less than one.
pub fn target_height(source_width: u32, source_height: u32, target_width: u32) -> Result<u32> {
    if source_width == 0 || source_height == 0 {
        return Err(PixelArtError::invalid_input(format!(
            "image has zero size ({source_width}x{source_height})"
        )));
    }
    if target_width == 0 {
        return Err(PixelArtError::invalid_input(
            "width must be a positive number of blocks, got 0",
        ));
    }

    let numerator = 2 * target_width as u64 * source_height as u64 + source_width as u64;
    let height = (numerator / (2 * source_width as u64)).max(1);

    u32::try_from(height).map_err(|_| {
        PixelArtError::invalid_input(format!(
            "width {target_width} gives a grid height of {height} blocks, which is too large"
        ))
    })
}

/// Resamples `image` to `target_width` blocks wide.
pub fn resample(
    image: &DynamicImage,
    target_width: u32,
    filter: ResampleFilter,
    policy: TransparencyPolicy,
) -> Result<SampleGrid> {
    let (source_width, source_height) = (image.width(), image.height());
    let height = target_height(source_width, source_height, target_width)?;

    debug!(
        "Resampling {source_width}x{source_height} to {target_width}x{height} ({filter:?}, {policy:?})"
    );

    let mut rgba: RgbaImage = image.to_rgba8();
    if let TransparencyPolicy::Composite { background } = policy {
        for pixel in rgba.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let (r, g, b) = composite_over((r, g, b), a, background);
            pixel.0 = [r, g, b, 255];
        }
    }

    let samples = match filter.filter_type() {
        None => area_resample(&rgba, target_width, height),
        Some(filter_type) => imageops::resize(&rgba, target_width, height, filter_type)
            .pixels()
            .map(|p| Sample {
                rgb: (p.0[0], p.0[1], p.0[2]),
                alpha: p.0[3],
            })
            .collect(),
    };

    SampleGrid::new(target_width, height, samples)
}

/// Source pixel indices and their integer overlap with each output cell.
///
/// Output cell `i` spans `[i * n_in, (i + 1) * n_in)` and source pixel `s`
/// spans `[s * n_out, (s + 1) * n_out)` on a common axis scaled by `n_out * n_in`,
/// so every weight is exact and each cell's weights sum to `n_in`.
fn axis_weights(n_in: u32, n_out: u32) -> Vec<Vec<(u32, u64)>> {
    let (n_in, n_out) = (n_in as u64, n_out as u64);
    (0..n_out)
        .map(|i| {
            let start = i * n_in;
            let end = start + n_in;
            let first = start / n_out;
            let last = (end - 1) / n_out;
            (first..=last)
                .filter_map(|s| {
                    let lo = start.max(s * n_out);
                    let hi = end.min((s + 1) * n_out);
                    (hi > lo).then_some((s as u32, hi - lo))
                })
                .collect()
        })
        .collect()
}

fn rounded_div(numerator: u128, denominator: u128) -> u8 {
    ((2 * numerator + denominator) / (2 * denominator)).min(255) as u8
}

fn area_resample(rgba: &RgbaImage, width: u32, height: u32) -> Vec<Sample> {
    let x_weights = axis_weights(rgba.width(), width);
    let y_weights = axis_weights(rgba.height(), height);
    let mut samples = Vec::with_capacity(width as usize * height as usize);

    for row_weights in &y_weights {
        for col_weights in &x_weights {
            let mut total: u128 = 0;
            let mut alpha_sum: u128 = 0;
            let mut plain = [0u128; 3];
            let mut weighted = [0u128; 3];

            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    let w = (wx * wy) as u128;
                    let [r, g, b, a] = rgba.get_pixel(sx, sy).0;
                    let wa = w * a as u128;
                    total += w;
                    alpha_sum += wa;
                    for (channel, value) in [r, g, b].into_iter().enumerate() {
                        plain[channel] += w * value as u128;
                        weighted[channel] += wa * value as u128;
                    }
                }
            }

            // Colour is alpha weighted so transparent pixels do not bleed into
            // their neighbours; fully transparent cells fall back to the plain mean.
            let (sums, denominator) = if alpha_sum > 0 {
                (weighted, alpha_sum)
            } else {
                (plain, total)
            };

            samples.push(Sample {
                rgb: (
                    rounded_div(sums[0], denominator),
                    rounded_div(sums[1], denominator),
                    rounded_div(sums[2], denominator),
                ),
                alpha: rounded_div(alpha_sum, total),
            });
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{encode_png, rgb_image, rgba_image};

    #[test]
    fn test_target_height_keeps_aspect() {
        assert_eq!(target_height(100, 50, 64).unwrap(), 32);
        assert_eq!(target_height(2, 2, 2).unwrap(), 2);
        assert_eq!(target_height(3, 1, 2).unwrap(), 1); // 0.667 rounds up
        assert_eq!(target_height(4, 1, 2).unwrap(), 1); // 0.5 rounds half up
        assert_eq!(target_height(1000, 1, 10).unwrap(), 1); // never below one
        assert_eq!(target_height(640, 480, 64).unwrap(), 48);
        assert_eq!(target_height(7, 3, 5).unwrap(), 2); // 2.142
        assert_eq!(target_height(6, 5, 3).unwrap(), 3); // 2.5 rounds half up
    }

    #[test]
    fn test_target_height_matches_rounded_ratio() {
        for w0 in 1..40u32 {
            for h0 in 1..40u32 {
                for w in 1..40u32 {
                    let h = target_height(w0, h0, w).unwrap();
                    let exact = w as f64 * h0 as f64 / w0 as f64;
                    let expected = ((exact + 0.5).floor() as u32).max(1);
                    assert_eq!(h, expected, "w0={w0} h0={h0} w={w}");
                    assert!(h >= 1);
                }
            }
        }
    }

    #[test]
    fn test_target_height_rejects_zero() {
        assert!(matches!(
            target_height(10, 10, 0),
            Err(PixelArtError::InvalidInput(_))
        ));
        assert!(matches!(
            target_height(0, 10, 4),
            Err(PixelArtError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_axis_weights_sum_to_input() {
        for n_in in 1..20u32 {
            for n_out in 1..20u32 {
                let weights = axis_weights(n_in, n_out);
                assert_eq!(weights.len(), n_out as usize);
                for cell in &weights {
                    let sum: u64 = cell.iter().map(|(_, w)| w).sum();
                    assert_eq!(sum, n_in as u64);
                    assert!(cell.iter().all(|(s, _)| *s < n_in));
                }
            }
        }
    }

    #[test]
    fn test_same_size_area_is_identity() {
        let img = rgb_image(2, 2, &[(255, 0, 0), (0, 255, 0), (0, 0, 255), (255, 255, 255)]);
        let grid = resample(&img, 2, ResampleFilter::Area, TransparencyPolicy::default()).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 0).unwrap().rgb, (255, 0, 0));
        assert_eq!(grid.get(1, 0).unwrap().rgb, (0, 255, 0));
        assert_eq!(grid.get(0, 1).unwrap().rgb, (0, 0, 255));
        assert_eq!(grid.get(1, 1).unwrap().rgb, (255, 255, 255));
        assert!(grid.samples().iter().all(|s| s.alpha == 255));
        assert!(grid.get(2, 0).is_none());
    }

    #[test]
    fn test_area_downscale_averages_blocks() {
        // 4x2 -> 2x1: each output cell is the mean of a 2x2 block
        let img = rgb_image(
            4,
            2,
            &[
                (0, 0, 0), (100, 0, 0), (10, 10, 10), (10, 10, 10),
                (200, 0, 0), (100, 0, 0), (10, 10, 10), (30, 30, 30),
            ],
        );
        let grid = resample(&img, 2, ResampleFilter::Area, TransparencyPolicy::default()).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 1));
        assert_eq!(grid.get(0, 0).unwrap().rgb, (100, 0, 0));
        assert_eq!(grid.get(1, 0).unwrap().rgb, (15, 15, 15));
    }

    #[test]
    fn test_area_fractional_coverage() {
        // 3x1 -> 2x1: cell 0 covers pixel 0 fully and half of pixel 1
        let img = rgb_image(3, 1, &[(0, 0, 0), (90, 90, 90), (255, 255, 255)]);
        let grid = resample(&img, 2, ResampleFilter::Area, TransparencyPolicy::default()).unwrap();
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.get(0, 0).unwrap().rgb, (30, 30, 30));
        assert_eq!(grid.get(1, 0).unwrap().rgb, (200, 200, 200));
    }

    #[test]
    fn test_composite_uses_background() {
        let img = rgba_image(2, 1, &[(255, 0, 0, 0), (0, 0, 255, 255)]);
        let policy = TransparencyPolicy::Composite {
            background: (0, 255, 0),
        };
        let grid = resample(&img, 2, ResampleFilter::Area, policy).unwrap();
        assert_eq!(grid.get(0, 0).unwrap(), &Sample::opaque((0, 255, 0)));
        assert_eq!(grid.get(1, 0).unwrap(), &Sample::opaque((0, 0, 255)));
    }

    #[test]
    fn test_skip_policy_keeps_alpha_and_ignores_transparent_colour() {
        let img = rgba_image(2, 1, &[(255, 0, 0, 0), (0, 0, 200, 255)]);
        let policy = TransparencyPolicy::Skip { threshold: 128 };

        let same = resample(&img, 2, ResampleFilter::Area, policy).unwrap();
        assert_eq!(same.get(0, 0).unwrap().alpha, 0);
        assert_eq!(same.get(1, 0).unwrap().alpha, 255);

        let merged = resample(&img, 1, ResampleFilter::Area, policy).unwrap();
        let sample = merged.get(0, 0).unwrap();
        assert_eq!(sample.rgb, (0, 0, 200));
        assert_eq!(sample.alpha, 128);
    }

    #[test]
    fn test_library_filters_produce_requested_size() {
        let img = rgb_image(8, 4, &[(40, 80, 120); 32]);
        for filter in [
            ResampleFilter::Nearest,
            ResampleFilter::Triangle,
            ResampleFilter::CatmullRom,
            ResampleFilter::Gaussian,
            ResampleFilter::Lanczos3,
        ] {
            let grid = resample(&img, 4, filter, TransparencyPolicy::default()).unwrap();
            assert_eq!((grid.width(), grid.height()), (4, 2));
            assert_eq!(grid.samples().len(), 8);
        }

        let nearest =
            resample(&img, 4, ResampleFilter::Nearest, TransparencyPolicy::default()).unwrap();
        assert_eq!(nearest.get(3, 1).unwrap().rgb, (40, 80, 120));
    }

    #[test]
    fn test_resample_is_deterministic() {
        let pixels: Vec<(u8, u8, u8)> = (0..35u8).map(|i| (i * 7, 255 - i * 3, i)).collect();
        let img = rgb_image(7, 5, &pixels);
        let a = resample(&img, 3, ResampleFilter::Area, TransparencyPolicy::default()).unwrap();
        let b = resample(&img, 3, ResampleFilter::Area, TransparencyPolicy::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.height(), 2);
    }

    #[test]
    fn test_decode_image() {
        let img = rgb_image(3, 2, &[(1, 2, 3); 6]);
        let decoded = decode_image(&encode_png(&img)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));

        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(PixelArtError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_open_missing_image() {
        let err = open_image(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, PixelArtError::InvalidInput(_)));
        assert!(err.to_string().contains("picture.png"));
    }

    #[test]
    fn test_sample_grid_rejects_bad_shapes() {
        assert!(SampleGrid::new(0, 1, Vec::new()).is_err());
        assert!(SampleGrid::new(2, 1, vec![Sample::opaque((0, 0, 0))]).is_err());
        let grid = SampleGrid::new(1, 2, vec![Sample::opaque((0, 0, 0)); 2]).unwrap();
        assert_eq!(grid.rows().count(), 2);
    }
}

//! Converts raster images into Minecraft pixel art.
//!
//! The pipeline is a single pass: the image is resampled to one sample per
//! block ([`resample`]), each sample is matched to the nearest colour of a
//! block palette ([`mapping`]), and the matches become `setblock` commands
//! ([`commands`]) written as an `.mcfunction` script. A preview image and a
//! material bill can be produced alongside.

pub mod args;
pub mod block_definitions;
pub mod colors;
pub mod commands;
pub mod data_processing;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod output;
pub mod palette;
pub mod preview;
pub mod resample;
pub mod summary;
#[cfg(test)]
pub mod test_utilities;

pub use args::{Args, PixelArtConfig};
pub use error::{PixelArtError, Result};
pub use palette::{Palette, PaletteEntry};

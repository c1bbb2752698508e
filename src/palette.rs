//! Discrete block colour palettes and nearest-colour lookup.

use crate::block_definitions::{Block, BlockType};
use crate::colors::{rgb_distance, RGBTuple};
use crate::error::{PixelArtError, Result};

/// One placeable material and the colour it stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub material_name: String,
    pub rgb: RGBTuple,
}

impl PaletteEntry {
    pub fn new(material_name: impl Into<String>, rgb: RGBTuple) -> Self {
        Self {
            material_name: material_name.into(),
            rgb,
        }
    }

    pub fn block(&self) -> Block {
        Block::minecraft(&self.material_name)
    }
}

/// An ordered, non-empty set of materials with unique names.
///
/// Built once at startup and passed by reference to the stages that need it.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PixelArtError::configuration("palette must not be empty"));
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries[..i]
                .iter()
                .any(|other| other.material_name == entry.material_name)
            {
                return Err(PixelArtError::configuration(format!(
                    "duplicate palette material '{}'",
                    entry.material_name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The built-in sixteen colour palette for a block family.
    pub fn builtin(block_type: BlockType) -> Self {
        let entries = block_type
            .colors()
            .iter()
            .map(|(color, rgb)| PaletteEntry::new(block_type.material_name(color), *rgb))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Index of the entry closest to `rgb` by squared RGB distance.
    /// Exact ties resolve to the lowest index.
    pub fn nearest(&self, rgb: &RGBTuple) -> usize {
        let mut best_index: usize = 0;
        let mut best_distance: u32 = u32::MAX;

        for (index, entry) in self.entries.iter().enumerate() {
            let distance = rgb_distance(rgb, &entry.rgb);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }

        best_index
    }
}

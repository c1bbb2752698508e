//! Per-cell nearest palette classification. No dithering: every cell is
//! matched on its own sample only.

use crate::palette::Palette;
use crate::resample::{SampleGrid, TransparencyPolicy};

/// Palette index chosen for each cell, `None` where the cell was skipped as transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<usize>>,
}

impl MatchGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, col: u32, row: u32) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<usize>]> + '_ {
        self.cells.chunks(self.width as usize)
    }

    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    pub fn skipped(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

pub fn map_samples(samples: &SampleGrid, palette: &Palette, policy: TransparencyPolicy) -> MatchGrid {
    map_samples_with_progress(samples, palette, policy, |_| {})
}

/// Same as [`map_samples`], calling `on_row` after each finished row.
pub fn map_samples_with_progress<F>(
    samples: &SampleGrid,
    palette: &Palette,
    policy: TransparencyPolicy,
    mut on_row: F,
) -> MatchGrid
where
    F: FnMut(u32),
{
    let skip_below: Option<u8> = match policy {
        TransparencyPolicy::Skip { threshold } => Some(threshold),
        TransparencyPolicy::Composite { .. } => None,
    };

    let mut cells = Vec::with_capacity(samples.samples().len());
    for (row, row_samples) in (0u32..).zip(samples.rows()) {
        cells.extend(row_samples.iter().map(|sample| match skip_below {
            Some(threshold) if sample.alpha < threshold => None,
            _ => Some(palette.nearest(&sample.rgb)),
        }));
        on_row(row);
    }

    MatchGrid {
        width: samples.width(),
        height: samples.height(),
        cells,
    }
}

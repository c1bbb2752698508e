//! Material bill for a generated picture: how many blocks of each kind it needs.

use crate::block_definitions::BlockType;
use crate::commands::{BlockPos, Layout};
use crate::mapping::MatchGrid;
use crate::palette::Palette;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MaterialCount {
    pub material: String,
    pub count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummary {
    pub width: u32,
    pub height: u32,
    pub block_type: BlockType,
    pub layout: Layout,
    pub origin: BlockPos,
    pub total_blocks: usize,
    pub skipped_cells: usize,
    /// Used materials only, in palette order.
    pub materials: Vec<MaterialCount>,
}

impl MaterialSummary {
    pub fn from_matches(
        matches: &MatchGrid,
        palette: &Palette,
        block_type: BlockType,
        layout: Layout,
        origin: BlockPos,
    ) -> Self {
        let mut counts = vec![0usize; palette.len()];
        for index in matches.cells().iter().flatten() {
            counts[*index] += 1;
        }

        let materials: Vec<MaterialCount> = palette
            .entries()
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(entry, count)| MaterialCount {
                material: entry.block().to_string(),
                count,
            })
            .collect();

        Self {
            width: matches.width(),
            height: matches.height(),
            block_type,
            layout,
            origin,
            total_blocks: materials.iter().map(|m| m.count).sum(),
            skipped_cells: matches.skipped(),
            materials,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the bill as a table, stacks of 64 included.
    pub fn print(&self) {
        println!(
            "{} {}x{} blocks, {} placed, {} skipped",
            "Materials:".bold(),
            self.width,
            self.height,
            self.total_blocks,
            self.skipped_cells
        );
        for entry in &self.materials {
            let stacks = entry.count / 64;
            let rest = entry.count % 64;
            println!(
                "  {:<32} {:>7}  ({} stacks + {})",
                entry.material,
                entry.count,
                stacks,
                rest
            );
        }
    }
}

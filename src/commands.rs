//! Turns a match grid into ordered `setblock` placement commands.
//!
//! Grid column `c` always runs along +X. Grid row `r` becomes a row offset of
//! `r`, or `H - 1 - r` when flipped, applied along +Z for a floor and +Y for a
//! wall. The remaining axis stays at the origin. Commands are emitted in
//! ascending row offset, columns left to right inside each row.

use crate::block_definitions::Block;
use crate::error::{PixelArtError, Result};
use crate::mapping::MatchGrid;
use crate::palette::Palette;
use clap::ValueEnum;
use serde::Serialize;

pub const PLACE_COMMAND: &str = "setblock";

/// Plane the picture is built in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Lying flat on the ground: columns along X, rows along Z at a fixed Y
    #[default]
    Floor,
    /// Standing upright: columns along X, rows along Y at a fixed Z
    Wall,
}

/// Optional trailing `setblock` mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlaceMode {
    Replace,
    Keep,
    Destroy,
}

impl PlaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceMode::Replace => "replace",
            PlaceMode::Keep => "keep",
            PlaceMode::Destroy => "destroy",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockPos {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateLayout {
    pub origin: BlockPos,
    pub layout: Layout,
    pub flip_y: bool,
}

impl CoordinateLayout {
    /// Offset along the row axis for grid row `row` of a grid `height` rows tall.
    pub fn row_offset(&self, row: u32, height: u32) -> i64 {
        if self.flip_y {
            height as i64 - 1 - row as i64
        } else {
            row as i64
        }
    }

    /// World position of a grid cell, or `InvalidInput` when it falls outside `i64`.
    pub fn position(&self, col: u32, row: u32, height: u32) -> Result<BlockPos> {
        let row_offset = self.row_offset(row, height);
        let x = offset_axis("x", self.origin.x, col as i64)?;
        Ok(match self.layout {
            Layout::Floor => BlockPos::new(
                x,
                self.origin.y,
                offset_axis("z", self.origin.z, row_offset)?,
            ),
            Layout::Wall => BlockPos::new(
                x,
                offset_axis("y", self.origin.y, row_offset)?,
                self.origin.z,
            ),
        })
    }
}

fn offset_axis(axis: &str, origin: i64, offset: i64) -> Result<i64> {
    origin.checked_add(offset).ok_or_else(|| {
        PixelArtError::invalid_input(format!(
            "start {axis} {origin} plus offset {offset} is out of range"
        ))
    })
}

/// Textual options for rendering commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptFormat {
    /// Write X and Z as `~`-relative offsets; Y stays absolute.
    pub relative_horizontal: bool,
    pub place_mode: Option<PlaceMode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementCommand {
    pub col: u32,
    pub row: u32,
    pub position: BlockPos,
    pub material_name: String,
}

impl PlacementCommand {
    pub fn block(&self) -> Block {
        Block::minecraft(&self.material_name)
    }

    pub fn to_command(&self, format: &ScriptFormat) -> String {
        let (x, z) = if format.relative_horizontal {
            (offset_token(self.position.x), offset_token(self.position.z))
        } else {
            (self.position.x.to_string(), self.position.z.to_string())
        };

        let mut command = format!(
            "{PLACE_COMMAND} {x} {} {z} {}",
            self.position.y,
            self.block()
        );
        if let Some(mode) = format.place_mode {
            command.push(' ');
            command.push_str(mode.as_str());
        }
        command
    }
}

/// Relative coordinate token: `0 -> "~"`, `5 -> "~5"`, `-2 -> "~-2"`.
fn offset_token(offset: i64) -> String {
    if offset == 0 {
        "~".to_string()
    } else {
        format!("~{offset}")
    }
}

/// One command per matched cell; skipped cells produce nothing.
pub fn emit_commands(
    matches: &MatchGrid,
    palette: &Palette,
    layout: &CoordinateLayout,
) -> Result<Vec<PlacementCommand>> {
    let height = matches.height();
    let mut rows: Vec<u32> = (0..height).collect();
    if layout.flip_y {
        rows.reverse();
    }

    let mut commands = Vec::with_capacity(matches.cells().len());
    for row in rows {
        for col in 0..matches.width() {
            let Some(entry) = matches.get(col, row).and_then(|index| palette.get(index)) else {
                continue;
            };
            commands.push(PlacementCommand {
                col,
                row,
                position: layout.position(col, row, height)?,
                material_name: entry.material_name.clone(),
            });
        }
    }
    Ok(commands)
}

/// Newline-terminated script text, one command per line.
pub fn render_script(commands: &[PlacementCommand], format: &ScriptFormat) -> String {
    let mut script = String::with_capacity(commands.len() * 48);
    for command in commands {
        script.push_str(&command.to_command(format));
        script.push('\n');
    }
    script
}

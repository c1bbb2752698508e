use crate::colors::RGBTuple;
use crate::error::PixelArtError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A namespaced block id such as `minecraft:white_concrete`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub namespace: String,
    pub name: String,
}

impl Block {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn minecraft(name: &str) -> Self {
        Self::new("minecraft", name)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Block family used to build the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Concrete,
    Wool,
}

impl BlockType {
    pub const ALL: [BlockType; 2] = [BlockType::Concrete, BlockType::Wool];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Concrete => "concrete",
            BlockType::Wool => "wool",
        }
    }

    /// The sixteen dye colours of this family with their approximate in-game RGB.
    pub fn colors(&self) -> &'static [(&'static str, RGBTuple)] {
        match self {
            BlockType::Concrete => &CONCRETE_COLORS,
            BlockType::Wool => &WOOL_COLORS,
        }
    }

    /// In-game material name for a dye colour, e.g. `light_blue_wool`.
    pub fn material_name(&self, color: &str) -> String {
        format!("{color}_{}", self.as_str())
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = PixelArtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|block_type| block_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PixelArtError::invalid_input(format!(
                    "unknown block type '{s}' (expected one of: concrete, wool)"
                ))
            })
    }
}

#[rustfmt::skip]
pub const CONCRETE_COLORS: [(&str, RGBTuple); 16] = [
    ("white",      (209, 213, 214)),
    ("orange",     (240, 118, 19)),
    ("magenta",    (189, 68, 179)),
    ("light_blue", (58, 175, 217)),
    ("yellow",     (249, 198, 39)),
    ("lime",       (112, 185, 25)),
    ("pink",       (237, 141, 172)),
    ("gray",       (62, 68, 71)),
    ("light_gray", (142, 142, 134)),
    ("cyan",       (21, 137, 142)),
    ("purple",     (121, 42, 172)),
    ("blue",       (53, 57, 157)),
    ("brown",      (100, 58, 36)),
    ("green",      (73, 91, 36)),
    ("red",        (161, 39, 34)),
    ("black",      (20, 21, 25)),
];

#[rustfmt::skip]
pub const WOOL_COLORS: [(&str, RGBTuple); 16] = [
    ("white",      (234, 236, 237)),
    ("orange",     (241, 118, 20)),
    ("magenta",    (238, 77, 201)),
    ("light_blue", (128, 199, 248)),
    ("yellow",     (250, 198, 39)),
    ("lime",       (112, 185, 25)),
    ("pink",       (242, 141, 170)),
    ("gray",       (57, 57, 57)),
    ("light_gray", (151, 151, 151)),
    ("cyan",       (20, 137, 140)),
    ("purple",     (107, 50, 168)),
    ("blue",       (44, 46, 143)),
    ("brown",      (96, 59, 31)),
    ("green",      (73, 91, 36)),
    ("red",        (176, 46, 38)),
    ("black",      (12, 12, 12)),
];

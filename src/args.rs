use crate::block_definitions::BlockType;
use crate::colors::color_text_to_rgb_tuple;
use crate::commands::{BlockPos, CoordinateLayout, Layout, PlaceMode, ScriptFormat};
use crate::error::{PixelArtError, Result};
use crate::output::image_format_for;
use crate::resample::{ResampleFilter, TransparencyPolicy};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Input image file (png/jpg/...)
    pub infile: PathBuf,

    /// Target picture width in blocks; the height follows the aspect ratio (required)
    #[arg(long, short = 'W', allow_negative_numbers = true)]
    pub width: i64,

    /// Output .mcfunction file
    #[arg(long, short = 'o', default_value = "pixelart.mcfunction")]
    pub out: PathBuf,

    /// X coordinate of the first column
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub startx: i64,

    /// Y coordinate of the picture (floor) or of its first row (wall)
    #[arg(long, default_value_t = 64, allow_negative_numbers = true)]
    pub starty: i64,

    /// Z coordinate of the first row (floor) or of the picture (wall)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub startz: i64,

    /// Block family to map colours onto (concrete or wool)
    #[arg(long, default_value = "concrete")]
    pub blocktype: String,

    /// Reverse the row order so the bottom image row gets row offset 0
    #[arg(long, alias = "flip-y")]
    pub flipy: bool,

    /// Build the picture flat on the ground or upright as a wall
    #[arg(long, value_enum, default_value_t = Layout::Floor)]
    pub layout: Layout,

    /// Write X and Z as ~relative coordinates (for running from a command block or player)
    #[arg(long)]
    pub relative: bool,

    /// Append a setblock mode to every command (optional)
    #[arg(long, value_enum)]
    pub place_mode: Option<PlaceMode>,

    /// Resampling filter used to shrink the image to the block grid
    #[arg(long, value_enum, default_value_t = ResampleFilter::Area)]
    pub filter: ResampleFilter,

    /// Colour transparent pixels are blended onto (default white)
    #[arg(long)]
    pub background: Option<String>,

    /// Leave transparent cells empty instead of blending them onto the background
    #[arg(long)]
    pub skip_transparent: bool,

    /// Alpha below which a cell is skipped (requires --skip-transparent, default 128)
    #[arg(long)]
    pub alpha_threshold: Option<u8>,

    /// Save a preview image of the mapped colours (optional)
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Size of one block in the preview, in pixels
    #[arg(long, default_value_t = 1)]
    pub preview_scale: u32,

    /// Write the material bill as JSON (optional)
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Abort if the script would contain more commands than this
    #[arg(long, default_value_t = 100_000)]
    pub max_commands: usize,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Validated settings for one conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelArtConfig {
    pub input: PathBuf,
    pub width: u32,
    pub block_type: BlockType,
    pub filter: ResampleFilter,
    pub transparency: TransparencyPolicy,
    pub coordinates: CoordinateLayout,
    pub format: ScriptFormat,
    pub output_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub preview_scale: u32,
    pub summary_path: Option<PathBuf>,
    pub max_commands: usize,
}

impl PixelArtConfig {
    /// Defaults matching the command line, for library callers.
    pub fn new(input: impl Into<PathBuf>, width: u32, block_type: BlockType) -> Self {
        Self {
            input: input.into(),
            width,
            block_type,
            filter: ResampleFilter::default(),
            transparency: TransparencyPolicy::default(),
            coordinates: CoordinateLayout {
                origin: BlockPos::new(0, 64, 0),
                layout: Layout::Floor,
                flip_y: false,
            },
            format: ScriptFormat::default(),
            output_path: PathBuf::from("pixelart.mcfunction"),
            preview_path: None,
            preview_scale: 1,
            summary_path: None,
            max_commands: 100_000,
        }
    }

    /// Checks every option before any image work starts.
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.width <= 0 {
            return Err(PixelArtError::invalid_input(format!(
                "--width must be a positive number of blocks, got {}",
                args.width
            )));
        }
        let width = u32::try_from(args.width).map_err(|_| {
            PixelArtError::invalid_input(format!("--width {} is too large", args.width))
        })?;

        let block_type: BlockType = args.blocktype.parse()?;

        let transparency = transparency_policy(args)?;

        if args.preview_scale == 0 {
            return Err(PixelArtError::configuration(
                "--preview-scale must be at least 1",
            ));
        }
        if let Some(preview) = &args.preview {
            image_format_for(preview)?;
        }
        if args.max_commands == 0 {
            return Err(PixelArtError::configuration(
                "--max-commands must be at least 1",
            ));
        }

        check_distinct_outputs(&[
            Some(("--out", args.out.as_path())),
            args.preview.as_deref().map(|p| ("--preview", p)),
            args.summary.as_deref().map(|p| ("--summary", p)),
        ])?;

        Ok(Self {
            input: args.infile.clone(),
            width,
            block_type,
            filter: args.filter,
            transparency,
            coordinates: CoordinateLayout {
                origin: BlockPos::new(args.startx, args.starty, args.startz),
                layout: args.layout,
                flip_y: args.flipy,
            },
            format: ScriptFormat {
                relative_horizontal: args.relative,
                place_mode: args.place_mode,
            },
            output_path: args.out.clone(),
            preview_path: args.preview.clone(),
            preview_scale: args.preview_scale,
            summary_path: args.summary.clone(),
            max_commands: args.max_commands,
        })
    }
}

fn transparency_policy(args: &Args) -> Result<TransparencyPolicy> {
    if args.skip_transparent {
        if args.background.is_some() {
            return Err(PixelArtError::configuration(
                "--background has no effect together with --skip-transparent",
            ));
        }
        return Ok(TransparencyPolicy::Skip {
            threshold: args.alpha_threshold.unwrap_or(DEFAULT_ALPHA_THRESHOLD),
        });
    }

    if args.alpha_threshold.is_some() {
        return Err(PixelArtError::configuration(
            "--alpha-threshold requires --skip-transparent",
        ));
    }

    let background = match &args.background {
        Some(text) => color_text_to_rgb_tuple(text).ok_or_else(|| {
            PixelArtError::invalid_input(format!(
                "cannot parse --background colour '{text}' (use #rrggbb, #rgb or a colour name)"
            ))
        })?,
        None => (255, 255, 255),
    };
    Ok(TransparencyPolicy::Composite { background })
}

fn check_distinct_outputs(outputs: &[Option<(&str, &Path)>]) -> Result<()> {
    let outputs: Vec<(&str, &Path)> = outputs.iter().flatten().copied().collect();
    for (i, (flag, path)) in outputs.iter().enumerate() {
        if let Some((other_flag, _)) = outputs[..i].iter().find(|(_, other)| other == path) {
            return Err(PixelArtError::configuration(format!(
                "{other_flag} and {flag} both point to {}",
                path.display()
            )));
        }
    }
    Ok(())
}

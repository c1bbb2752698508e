use crate::args::PixelArtConfig;
use crate::commands::{emit_commands, render_script, PlacementCommand};
use crate::error::{PixelArtError, Result};
use crate::mapping::{map_samples_with_progress, MatchGrid};
use crate::output::{write_all, PendingFile};
use crate::palette::Palette;
use crate::preview::{render_preview, scale_preview};
use crate::resample::{open_image, resample, target_height, SampleGrid, TransparencyPolicy};
use crate::summary::MaterialSummary;
use colored::Colorize;
use image::{DynamicImage, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

/// Default `maxCommandChainLength` gamerule; longer functions are cut short in game.
pub const MAX_COMMAND_CHAIN_LENGTH: usize = 65_536;

/// Everything one run produces, held in memory until it is written.
pub struct PixelArt {
    pub samples: SampleGrid,
    pub matches: MatchGrid,
    pub commands: Vec<PlacementCommand>,
    pub script: String,
    pub preview: Option<RgbaImage>,
    pub summary: MaterialSummary,
}

fn check_command_limit(count: u64, config: &PixelArtConfig) -> Result<()> {
    if count > config.max_commands as u64 {
        return Err(PixelArtError::configuration(format!(
            "the picture needs {count} commands, more than --max-commands {}; \
             lower --width or raise the limit",
            config.max_commands
        )));
    }
    Ok(())
}

/// Runs resampling, colour matching, command emission and preview rendering.
/// Nothing is written to disk.
pub fn generate_pixel_art(
    image: &DynamicImage,
    palette: &Palette,
    config: &PixelArtConfig,
) -> Result<PixelArt> {
    // Every cell becomes a command unless transparent cells may be skipped
    if let TransparencyPolicy::Composite { .. } = config.transparency {
        let height = target_height(image.width(), image.height(), config.width)?;
        check_command_limit(config.width as u64 * height as u64, config)?;
    }

    println!("{} Resampling image...", "[2/5]".bold());
    let samples = resample(image, config.width, config.filter, config.transparency)?;
    debug!(
        "Block grid is {}x{} ({} cells)",
        samples.width(),
        samples.height(),
        samples.samples().len()
    );

    println!("{} Matching colours...", "[3/5]".bold());
    let match_pb: ProgressBar = ProgressBar::new(samples.height() as u64);
    match_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:45.white/black}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    let matches = map_samples_with_progress(&samples, palette, config.transparency, |_| {
        match_pb.inc(1)
    });
    match_pb.finish_and_clear();

    println!("{} Building commands...", "[4/5]".bold());
    let commands = emit_commands(&matches, palette, &config.coordinates)?;
    check_command_limit(commands.len() as u64, config)?;
    if commands.len() > MAX_COMMAND_CHAIN_LENGTH {
        warn!(
            "{} commands exceed the default maxCommandChainLength of {}; \
             raise the gamerule or the function will stop early",
            commands.len(),
            MAX_COMMAND_CHAIN_LENGTH
        );
    }
    let script = render_script(&commands, &config.format);

    let preview = match config.preview_path {
        Some(_) => Some(scale_preview(
            render_preview(&matches, palette),
            config.preview_scale,
        )?),
        None => None,
    };

    let summary = MaterialSummary::from_matches(
        &matches,
        palette,
        config.block_type,
        config.coordinates.layout,
        config.coordinates.origin,
    );

    Ok(PixelArt {
        samples,
        matches,
        commands,
        script,
        preview,
        summary,
    })
}

/// Renders every requested output file in memory.
pub fn pending_files(art: &PixelArt, config: &PixelArtConfig) -> Result<Vec<PendingFile>> {
    let mut files = vec![PendingFile::text(&config.output_path, art.script.clone())];

    if let (Some(path), Some(preview)) = (&config.preview_path, &art.preview) {
        files.push(PendingFile::image(path, preview)?);
    }

    if let Some(path) = &config.summary_path {
        let json = art
            .summary
            .to_json()
            .map_err(|e| PixelArtError::io_failure(path, std::io::Error::other(e)))?;
        files.push(PendingFile::text(path, json));
    }

    Ok(files)
}

/// Converts the configured image and writes the script and any extra outputs.
pub fn run(config: &PixelArtConfig) -> Result<PixelArt> {
    let palette = Palette::builtin(config.block_type);

    println!("{} Loading image...", "[1/5]".bold());
    let image = open_image(&config.input)?;
    debug!(
        "Loaded {} ({}x{}, {:?})",
        config.input.display(),
        image.width(),
        image.height(),
        image.color()
    );
    if config.width > image.width() {
        warn!(
            "--width {} is larger than the image ({} px); pixels will be repeated",
            config.width,
            image.width()
        );
    }

    let art = generate_pixel_art(&image, &palette, config)?;

    println!("{} Writing files...", "[5/5]".bold());
    let files = pending_files(&art, config)?;
    write_all(&files)?;

    println!(
        "Saved {} commands to {}",
        art.commands.len(),
        config.output_path.display().to_string().bright_white().bold()
    );
    if let Some(path) = &config.preview_path {
        println!("Saved preview: {}", path.display());
    }
    if let Some(path) = &config.summary_path {
        println!("Saved material summary: {}", path.display());
    }

    Ok(art)
}

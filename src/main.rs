use clap::Parser;
use colored::*;
use mcpixelart::{data_processing, logging, Args, PixelArtConfig};
use std::process::ExitCode;

fn print_banner() {
    let version: &str = env!("CARGO_PKG_VERSION");
    let description: &str = env!("CARGO_PKG_DESCRIPTION");
    println!(
        "\n  {} {}\n  {}\n",
        "mcpixelart".bright_white().bold(),
        format!("v{version}").dimmed(),
        description
    );
}

fn print_usage_hints() {
    println!("{}", "Done. To use the .mcfunction file:".green().bold());
    println!("  - Place it in a datapack function folder, e.g. datapacks/<pack>/data/<namespace>/function/<name>.mcfunction");
    println!("  - Run in-game with: /function <namespace>:<name>");
}

fn main() -> ExitCode {
    let args: Args = Args::parse();
    if let Err(e) = logging::init(args.debug) {
        eprintln!("{}: {}", "Warning".yellow().bold(), e);
    }
    print_banner();

    let result = PixelArtConfig::from_args(&args).and_then(|config| {
        let art = data_processing::run(&config)?;
        art.summary.print();
        Ok(())
    });

    match result {
        Ok(()) => {
            print_usage_hints();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

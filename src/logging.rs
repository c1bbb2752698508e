use colored::Colorize;
use log::{Level, LevelFilter, SetLoggerError};
use std::io::Write;

/// Installs an `env_logger` backend writing coloured level tags to stderr.
/// `RUST_LOG` overrides the level picked from `--debug`. Fails if a logger is already set.
pub fn init(debug: bool) -> Result<(), SetLoggerError> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let tag = match record.level() {
                Level::Error => "error".red().bold(),
                Level::Warn => "warning".yellow().bold(),
                Level::Info => "info".green(),
                Level::Debug => "debug".cyan(),
                Level::Trace => "trace".dimmed(),
            };
            writeln!(buf, "{tag}: {}", record.args())
        })
        .try_init()
}

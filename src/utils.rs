use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::{fs, io, path::Path};

const CRATE_TARGET: &str = "rewards_cli";
const BIN_TARGET: &str = "rewards";

/// Logs go to stderr so table and json output on stdout stay clean.
pub fn setup_logger(verbose: bool) -> Result<()> {
    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Red,
        error: Color::BrightRed,
        ..ColoredLevelConfig::new()
    };

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                message
            ))
        })
        .chain(io::stderr())
        .level(LevelFilter::Error)
        .level_for(CRATE_TARGET, level)
        .level_for(BIN_TARGET, level)
        .apply()?;

    Ok(())
}

pub fn write_to_file(data: &[u8], path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)
}

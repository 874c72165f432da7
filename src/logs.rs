use std::fs::File;
use std::path::Path;

use anyhow::Result;
use simplelog::{
    ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

/// Terminal logger for embedders that want the core's messages on
/// stderr. Call once at startup.
pub fn init() -> Result<()> {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    TermLogger::init(
        LevelFilter::Info,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

/// File-backed logger for embedders without a terminal.
pub fn init_with_file(path: &Path) -> Result<()> {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(LevelFilter::Info, config, File::create(path)?)?;
    Ok(())
}

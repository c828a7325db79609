use crate::cli::LoggerArgs;
use anyhow::{Context, Result};
use quicklogs::{log_file_path, Resolver};
use std::io::Write;

pub fn handle(resolver: &Resolver, args: &LoggerArgs, out: &mut impl Write) -> Result<()> {
    let name = args.name().filter(|n| !n.is_empty());
    let config = resolver
        .resolve(name, &args.options())
        .context("resolving logger options")?;

    let file = match &config.file_dir {
        Some(dir) => log_file_path(dir, name).display().to_string(),
        None => "none".to_string(),
    };

    writeln!(out, "name: {}", name.unwrap_or("<unnamed>"))?;
    writeln!(out, "level: {}", config.threshold)?;
    writeln!(out, "console: {}", config.console)?;
    writeln!(out, "file: {file}")?;
    writeln!(out, "source: {}", config.source_display)?;
    writeln!(out, "max_bytes: {}", config.max_file_bytes)?;
    writeln!(out, "backup_count: {}", config.max_rotations)?;
    Ok(())
}

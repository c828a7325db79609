use clap::{Args, Parser, Subcommand};
use quicklogs::{Level, LevelArg, LoggerOptions, SourceDisplay, Threshold};
use std::path::PathBuf;

/// Write log lines through a named, environment-configured logger.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub logger: LoggerArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Logger options. Anything left out falls back to `{NAME}_*` and then
/// `QUICKLOGS_*` environment variables.
#[derive(Debug, Default, Args)]
pub struct LoggerArgs {
    /// Logger name, also the log file stem
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Threshold as a level name or a number
    #[arg(long, global = true)]
    pub level: Option<String>,

    /// Write to the terminal (true/false)
    #[arg(long, global = true)]
    pub console: Option<bool>,

    /// Directory for the rotating log file
    #[arg(long, global = true)]
    pub file_dir: Option<PathBuf>,

    /// Source location display: none, filename or pathname
    #[arg(long, global = true, value_parser = parse_source_display)]
    pub show_source: Option<SourceDisplay>,

    /// Rotate once the log file would reach this many bytes
    #[arg(long, global = true)]
    pub max_bytes: Option<u64>,

    /// Number of rotated files to keep
    #[arg(long, global = true)]
    pub backup_count: Option<usize>,
}

impl LoggerArgs {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn options(&self) -> LoggerOptions {
        LoggerOptions {
            level: self.level.as_deref().map(level_arg),
            console: self.console,
            file_dir: self.file_dir.clone(),
            source_display: self.show_source,
            max_file_bytes: self.max_bytes,
            max_rotations: self.backup_count,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log each message, or each line of stdin when no message is given
    Emit {
        /// Level of the emitted records
        #[arg(long, default_value = "info", value_parser = parse_level)]
        at: Level,

        messages: Vec<String>,
    },
    /// Print the resolved configuration without opening any sink
    Resolve,
}

/// Numbers are ordinals, anything else is a level name.
fn level_arg(value: &str) -> LevelArg {
    match value.trim().parse::<u32>() {
        Ok(ordinal) => LevelArg::Ordinal(ordinal),
        Err(_) => LevelArg::Name(value.to_string()),
    }
}

fn parse_level(value: &str) -> Result<Level, String> {
    let threshold = Threshold::from_name(value).map_err(|e| e.to_string())?;
    Level::from_ordinal(threshold.0).ok_or_else(|| format!("{value:?} is not a record level"))
}

fn parse_source_display(value: &str) -> Result<SourceDisplay, String> {
    value.parse().map_err(|e: quicklogs::Error| e.to_string())
}

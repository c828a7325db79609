use snafu::Snafu;
use std::path::PathBuf;

/// Errors raised while resolving options or building a logger's sinks.
///
/// None of these are recovered internally: a logger that cannot be built as
/// requested is not built at all.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unknown log level: {name:?}"))]
    UnknownLevel { name: String },

    #[snafu(display(
        "Invalid source display {value:?}, expected one of none, filename, pathname"
    ))]
    InvalidSourceDisplay { value: String },

    #[snafu(display(
        "Environment variable {key} has malformed value {raw:?}, expected {expected}"
    ))]
    MalformedEnv {
        key: String,
        raw: String,
        expected: &'static str,
    },

    #[snafu(display("Failed to create log directory {}: {source}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to open log file {}: {source}", path.display()))]
    OpenFile {
        path: PathBuf,
        source: flexi_logger::FlexiLoggerError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

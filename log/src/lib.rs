//! Named, idempotently configured loggers with console and size-rotated file
//! output.
//!
//! A logger is requested by name. The first request builds it from the given
//! [`LoggerOptions`] and the environment; every later request for the same
//! name returns that same logger untouched.
//!
//! ```no_run
//! use quicklogs::{get_logger, Level, LoggerOptions, SourceDisplay};
//!
//! let logger = get_logger(
//!     Some("svc"),
//!     &LoggerOptions::new()
//!         .level(Level::Debug)
//!         .file_dir("/var/log/svc")
//!         .source_display(SourceDisplay::FullPath),
//! )?;
//! logger.info("started");
//! # Ok::<(), quicklogs::Error>(())
//! ```
//!
//! ## Environment Variables
//!
//! Options left unset are read from the environment, name-scoped first:
//!
//! 1. **`{NAME}_{OPTION}`** - as given, lower-case, then upper-case
//! 2. **`QUICKLOGS_{OPTION}`** - same case handling
//! 3. **Default**
//!
//! | Option | Keys | Default |
//! |---|---|---|
//! | level | `LOG_LEVEL` | `INFO` |
//! | console | `STDOUT`, `TERMINAL` | on if no file directory |
//! | file directory | `FILE_DIR` | none |
//! | source display | `SHOW_SOURCE`, `SHOW_FILE_PATH` | none |
//! | max file bytes | `MAX_BYTES`, `FILE_MAX_BYTES` | 20,000,000 |
//! | rotations kept | `BACKUP_COUNT`, `MAX_ROTATIONS` | 2 |
//!
//! ## Log File Location
//!
//! `{file_dir}/{name}.log`, or `{file_dir}/quicklogs-<pid>.log` for the
//! unnamed logger. Rotated generations are `{stem}_r00000.log`,
//! `{stem}_r00001.log`, ..., oldest first.

pub mod env;
mod error;
pub mod format;
pub mod level;
mod logger;
pub mod options;
mod registry;
pub mod rotating;
pub mod sink;
pub mod subscriber;

pub use env::{EnvReader, MapEnv, ProcessEnv};
pub use error::{Error, Result};
pub use level::{Level, LevelArg, Threshold};
pub use logger::{log_file_path, synthetic_name, Logger};
pub use options::{LoggerOptions, ResolvedConfig, Resolver, SourceDisplay};
pub use registry::{Acquired, Registry, VacantLogger};
pub use sink::SinkKind;

/// Get or build a logger from the process-wide [`Registry`].
pub fn get_logger(name: Option<&str>, options: &LoggerOptions) -> Result<Logger> {
    Registry::global().get_logger(name, options)
}

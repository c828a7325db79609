//! Option resolution.
//!
//! Every option resolves through the same chain, stopping at the first
//! defined value:
//!
//! 1. The explicit argument in [`LoggerOptions`] (no environment lookup at all)
//! 2. `{name}_{OPTION}`, any case, when the logger has a name
//! 3. `{PREFIX}_{OPTION}`, any case
//! 4. The built-in default
//!
//! Several options also answer to a legacy key (`TERMINAL` for `STDOUT`,
//! `SHOW_FILE_PATH` for `SHOW_SOURCE`, ...). Within a scope the primary key
//! is probed before its alias.

use crate::{
    env::{any_case, EnvReader, EnvValue, Probe, ProcessEnv},
    error::{Error, InvalidSourceDisplaySnafu, Result},
    level::{LevelArg, Threshold},
};
use std::{fmt, path::PathBuf, str::FromStr, sync::Arc};

/// Prefix of the global environment variables, e.g. `QUICKLOGS_LOG_LEVEL`.
pub const GLOBAL_PREFIX: &str = "QUICKLOGS";
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20_000_000;
pub const DEFAULT_MAX_ROTATIONS: usize = 2;

/// How the source location of a record is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceDisplay {
    #[default]
    None,
    /// File name only, e.g. `main.rs:12`.
    Filename,
    /// Absolute path, e.g. `/src/app/main.rs:12`.
    FullPath,
}

impl FromStr for SourceDisplay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "false" => Ok(SourceDisplay::None),
            "filename" | "file" | "true" => Ok(SourceDisplay::Filename),
            "pathname" | "path" | "full" | "fullpath" | "full-path" | "absolute" => {
                Ok(SourceDisplay::FullPath)
            }
            _ => InvalidSourceDisplaySnafu { value: s }.fail(),
        }
    }
}

impl fmt::Display for SourceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceDisplay::None => "none",
            SourceDisplay::Filename => "filename",
            SourceDisplay::FullPath => "pathname",
        })
    }
}

/// Explicit arguments for building a logger.
///
/// `None` means "not provided" and defers to the environment; it is never
/// confused with `Some(false)` or `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerOptions {
    pub level: Option<LevelArg>,
    pub console: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub source_display: Option<SourceDisplay>,
    pub max_file_bytes: Option<u64>,
    pub max_rotations: Option<usize>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<LevelArg>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = Some(enabled);
        self
    }

    pub fn file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(dir.into());
        self
    }

    pub fn source_display(mut self, mode: SourceDisplay) -> Self {
        self.source_display = Some(mode);
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = Some(bytes);
        self
    }

    pub fn max_rotations(mut self, count: usize) -> Self {
        self.max_rotations = Some(count);
        self
    }
}

/// Options after resolution; what a logger is actually built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub threshold: Threshold,
    pub console: bool,
    pub file_dir: Option<PathBuf>,
    pub source_display: SourceDisplay,
    /// `0` disables rotation.
    pub max_file_bytes: u64,
    pub max_rotations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKey {
    LogLevel,
    Console,
    FileDir,
    SourceDisplay,
    MaxBytes,
    BackupCount,
}

impl OptionKey {
    /// Primary suffix first, then legacy aliases.
    fn suffixes(self) -> &'static [&'static str] {
        match self {
            OptionKey::LogLevel => &["LOG_LEVEL"],
            OptionKey::Console => &["STDOUT", "TERMINAL"],
            OptionKey::FileDir => &["FILE_DIR"],
            OptionKey::SourceDisplay => &["SHOW_SOURCE", "SHOW_FILE_PATH"],
            OptionKey::MaxBytes => &["MAX_BYTES", "FILE_MAX_BYTES"],
            OptionKey::BackupCount => &["BACKUP_COUNT", "MAX_ROTATIONS"],
        }
    }
}

/// A defined environment variable for some option.
struct EnvHit {
    key: String,
    suffix: &'static str,
    raw: String,
}

type Coerce<T> = fn(&'static str, EnvValue) -> std::result::Result<T, &'static str>;

/// Resolves [`LoggerOptions`] against an environment.
#[derive(Clone)]
pub struct Resolver {
    env: Arc<dyn EnvReader>,
    prefix: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Arc::new(ProcessEnv), GLOBAL_PREFIX)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new(env: Arc<dyn EnvReader>, prefix: impl Into<String>) -> Self {
        Self {
            env,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn resolve(&self, name: Option<&str>, options: &LoggerOptions) -> Result<ResolvedConfig> {
        let threshold = match &options.level {
            Some(arg) => arg.to_threshold()?,
            None => match self
                .probe(name, OptionKey::LogLevel, level_from_env)
                .into_result()?
            {
                Some(arg) => arg.to_threshold()?,
                None => Threshold::default(),
            },
        };

        let console = self.pick(options.console, name, OptionKey::Console, console_from_env)?;
        let file_dir = match &options.file_dir {
            Some(dir) => Some(dir.clone()),
            None => self
                .probe(name, OptionKey::FileDir, file_dir_from_env)
                .into_result()?
                .flatten(),
        };
        // A logger has to write somewhere.
        let console = console.unwrap_or(file_dir.is_none());

        let source_display = self
            .pick(
                options.source_display,
                name,
                OptionKey::SourceDisplay,
                source_display_from_env,
            )?
            .unwrap_or_default();

        let max_file_bytes = self
            .pick(
                options.max_file_bytes,
                name,
                OptionKey::MaxBytes,
                count_from_env,
            )?
            .unwrap_or(DEFAULT_MAX_FILE_BYTES);

        let max_rotations = self
            .pick(
                options.max_rotations,
                name,
                OptionKey::BackupCount,
                count_from_env,
            )?
            .unwrap_or(DEFAULT_MAX_ROTATIONS);

        Ok(ResolvedConfig {
            threshold,
            console,
            file_dir,
            source_display,
            max_file_bytes,
            max_rotations,
        })
    }

    fn pick<T>(
        &self,
        explicit: Option<T>,
        name: Option<&str>,
        key: OptionKey,
        coerce: Coerce<T>,
    ) -> Result<Option<T>> {
        match explicit {
            Some(value) => Ok(Some(value)),
            None => self.probe(name, key, coerce).into_result(),
        }
    }

    fn probe<T>(&self, name: Option<&str>, key: OptionKey, coerce: Coerce<T>) -> Probe<T> {
        let Some(hit) = self.lookup(name, key) else {
            return Probe::Absent;
        };
        tracing::trace!(key = %hit.key, "option taken from environment");
        match coerce(hit.suffix, EnvValue::parse(&hit.raw)) {
            Ok(value) => Probe::Found {
                key: hit.key,
                value,
            },
            Err(expected) => Probe::Malformed {
                key: hit.key,
                raw: hit.raw,
                expected,
            },
        }
    }

    fn lookup(&self, name: Option<&str>, key: OptionKey) -> Option<EnvHit> {
        let scopes = name
            .into_iter()
            .chain(std::iter::once(self.prefix.as_str()));
        for scope in scopes {
            for &suffix in key.suffixes() {
                let candidate = format!("{scope}_{suffix}");
                if let Some((key, raw)) = any_case(self.env.as_ref(), &candidate) {
                    return Some(EnvHit { key, suffix, raw });
                }
            }
        }
        None
    }
}

impl<T> Probe<T> {
    fn into_result(self) -> Result<Option<T>> {
        match self {
            Probe::Absent => Ok(None),
            Probe::Found { value, .. } => Ok(Some(value)),
            Probe::Malformed { key, raw, expected } => {
                Err(Error::MalformedEnv { key, raw, expected })
            }
        }
    }
}

fn level_from_env(_: &'static str, value: EnvValue) -> std::result::Result<LevelArg, &'static str> {
    const EXPECTED: &str = "a level name or number";
    match value {
        EnvValue::Int(n) => u32::try_from(n)
            .map(LevelArg::Ordinal)
            .map_err(|_| EXPECTED),
        EnvValue::Text(name) => Ok(LevelArg::Name(name)),
        EnvValue::Bool(_) => Err(EXPECTED),
    }
}

fn console_from_env(_: &'static str, value: EnvValue) -> std::result::Result<bool, &'static str> {
    match value {
        EnvValue::Bool(b) => Ok(b),
        EnvValue::Int(n) => Ok(n != 0),
        EnvValue::Text(_) => Err("true or false"),
    }
}

fn file_dir_from_env(
    _: &'static str,
    value: EnvValue,
) -> std::result::Result<Option<PathBuf>, &'static str> {
    match value {
        EnvValue::Text(dir) => Ok(Some(PathBuf::from(dir))),
        EnvValue::Int(n) => Ok(Some(PathBuf::from(n.to_string()))),
        EnvValue::Bool(false) => Ok(None),
        EnvValue::Bool(true) => Err("a directory path"),
    }
}

fn source_display_from_env(
    suffix: &'static str,
    value: EnvValue,
) -> std::result::Result<SourceDisplay, &'static str> {
    const EXPECTED: &str = "one of none, filename, pathname";
    match value {
        // SHOW_FILE_PATH only ever chose between file name and full path.
        EnvValue::Bool(true) if suffix == "SHOW_FILE_PATH" => Ok(SourceDisplay::FullPath),
        EnvValue::Bool(false) if suffix == "SHOW_FILE_PATH" => Ok(SourceDisplay::Filename),
        EnvValue::Bool(true) => Ok(SourceDisplay::Filename),
        EnvValue::Bool(false) => Ok(SourceDisplay::None),
        EnvValue::Text(mode) => mode.parse().map_err(|_| EXPECTED),
        EnvValue::Int(_) => Err(EXPECTED),
    }
}

fn count_from_env<T: TryFrom<i64>>(
    _: &'static str,
    value: EnvValue,
) -> std::result::Result<T, &'static str> {
    const EXPECTED: &str = "a non-negative integer";
    match value {
        EnvValue::Int(n) if n >= 0 => T::try_from(n).map_err(|_| EXPECTED),
        _ => Err(EXPECTED),
    }
}

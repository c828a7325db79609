//! Configured logger handles.

use crate::{
    error::{CreateDirSnafu, OpenFileSnafu, Result},
    format::{LineFormat, Record},
    level::{Level, Threshold, CRITICAL_TARGET},
    options::ResolvedConfig,
    rotating::RotatingFileWriter,
    sink::{self, SinkKind, SinkLayer},
};
use snafu::ResultExt;
use std::{
    fmt::{self, Display},
    fs,
    io::{self, Write},
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

/// File stem used by the unnamed logger, unique per process.
pub fn synthetic_name() -> String {
    format!("quicklogs-{}", std::process::id())
}

/// Handle to a fully configured logger.
///
/// Cloning is cheap and every clone shares the same sinks. Configuration is
/// fixed at construction. Records are never forwarded to any other logger.
///
/// Each logger owns its own `tracing` dispatcher whose layers are its sinks.
/// Records are sent to it as scoped events, so they are dropped when a log
/// call is made from inside another subscriber's callback.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    name: Option<String>,
    config: ResolvedConfig,
    dispatch: Dispatch,
    sinks: Vec<SinkKind>,
    file: Option<RotatingFileWriter>,
}

impl Logger {
    /// Build the sinks described by `config` and wrap them in a handle.
    ///
    /// Fails as a whole if any requested sink cannot be built.
    pub fn build(name: Option<&str>, config: ResolvedConfig) -> Result<Logger> {
        let format = LineFormat::new(name, config.source_display);

        let mut layers: Vec<SinkLayer> = Vec::new();
        let mut sinks = Vec::new();
        if config.console {
            layers.push(sink::console_layer(format.clone(), config.threshold));
            sinks.push(SinkKind::Console);
        }
        let file = match &config.file_dir {
            Some(dir) => {
                fs::create_dir_all(dir).context(CreateDirSnafu { path: dir })?;
                let path = log_file_path(dir, name);
                let stem = name.map_or_else(synthetic_name, str::to_string);
                let writer = RotatingFileWriter::open(
                    dir,
                    &stem,
                    config.max_file_bytes,
                    config.max_rotations,
                )
                .context(OpenFileSnafu { path: &path })?;
                layers.push(sink::file_layer(format, config.threshold, writer.clone()));
                sinks.push(SinkKind::File(path));
                Some(writer)
            }
            None => None,
        };

        tracing::debug!(
            name = name.unwrap_or("<unnamed>"),
            threshold = %config.threshold,
            sinks = sinks.len(),
            "configured logger"
        );

        let dispatch = if layers.is_empty() {
            Dispatch::none()
        } else {
            Dispatch::new(tracing_subscriber::registry().with(layers))
        };

        Ok(Logger {
            inner: Arc::new(Inner {
                name: name.map(str::to_string),
                config,
                dispatch,
                sinks,
                file,
            }),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.inner.config
    }

    pub fn threshold(&self) -> Threshold {
        self.inner.config.threshold
    }

    /// The subscriber writing to this logger's sinks.
    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.len()
    }

    pub fn sink_kinds(&self) -> Vec<SinkKind> {
        self.inner.sinks.clone()
    }

    /// Path of the file sink, if there is one.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.inner.file.as_ref().map(|w| w.path().to_path_buf())
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.threshold().allows(level)
    }

    /// Whether both handles refer to the same logger.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Display) {
        if !self.is_enabled_for(level) {
            return;
        }
        let location = Location::caller();
        self.emit(&Record {
            level,
            message: &message.to_string(),
            file: location.file(),
            line: location.line(),
        });
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.log(Level::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Display) {
        self.log(Level::Critical, message);
    }

    pub fn flush(&self) -> io::Result<()> {
        match &self.inner.file {
            Some(file) => file.clone().flush(),
            None => Ok(()),
        }
    }

    fn emit(&self, record: &Record<'_>) {
        let Record {
            level,
            message,
            file,
            line,
        } = *record;
        tracing::dispatcher::with_default(&self.inner.dispatch, || match level {
            Level::Debug => tracing::debug!(log.file = file, log.line = line, "{message}"),
            Level::Info => tracing::info!(log.file = file, log.line = line, "{message}"),
            Level::Warning => tracing::warn!(log.file = file, log.line = line, "{message}"),
            Level::Error => tracing::error!(log.file = file, log.line = line, "{message}"),
            Level::Critical => tracing::error!(
                target: CRITICAL_TARGET,
                { log.file = file, log.line = line },
                "{message}"
            ),
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .field("sinks", &self.inner.sinks)
            .finish()
    }
}

/// `{dir}/{name}.log`, or `{dir}/{synthetic_name()}.log` without a name.
pub fn log_file_path(dir: &Path, name: Option<&str>) -> PathBuf {
    let stem = match name {
        Some(name) => name.to_string(),
        None => synthetic_name(),
    };
    dir.join(format!("{stem}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SourceDisplay;
    use tempfile::TempDir;

    fn config(file_dir: Option<PathBuf>) -> ResolvedConfig {
        ResolvedConfig {
            threshold: Threshold::from(Level::Info),
            console: false,
            file_dir,
            source_display: SourceDisplay::Filename,
            max_file_bytes: 0,
            max_rotations: 2,
        }
    }

    #[test]
    fn filters_below_threshold() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::build(Some("filter"), config(Some(dir.path().to_path_buf())))
            .expect("build logger");

        logger.debug("hidden");
        logger.info("shown");
        logger.error("also shown");

        let contents = std::fs::read_to_string(dir.path().join("filter.log")).expect("read");
        assert!(!contents.contains("hidden"));
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("[INFO][filter][logger.rs:"));
        assert!(contents.contains("[ERROR][filter]"));
    }

    #[test]
    fn unnamed_logger_uses_synthetic_file_name() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::build(None, config(Some(dir.path().to_path_buf()))).expect("build");

        assert_eq!(
            logger.file_path(),
            Some(dir.path().join(format!("{}.log", synthetic_name())))
        );
        assert!(synthetic_name().contains(&std::process::id().to_string()));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("a").join("b");
        let logger = Logger::build(Some("nested"), config(Some(nested.clone()))).expect("build");

        assert!(nested.is_dir());
        assert_eq!(
            logger.sink_kinds(),
            vec![SinkKind::File(nested.join("nested.log"))]
        );
    }

    #[test]
    fn directory_creation_failure_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").expect("create file");

        let result = Logger::build(Some("svc"), config(Some(blocker.join("logs"))));
        assert!(matches!(result, Err(crate::Error::CreateDir { .. })));
    }

    #[test]
    fn no_sinks_when_nothing_requested() {
        let logger = Logger::build(Some("quiet"), config(None)).expect("build");
        assert_eq!(logger.sink_count(), 0);
        logger.critical("goes nowhere");
    }

    #[test]
    fn clones_share_identity() {
        let logger = Logger::build(Some("same"), config(None)).expect("build");
        let other = Logger::build(Some("same"), config(None)).expect("build");
        assert!(logger.ptr_eq(&logger.clone()));
        assert!(!logger.ptr_eq(&other));
    }

    #[test]
    fn critical_records_keep_their_level() {
        let dir = TempDir::new().expect("temp dir");
        let logger =
            Logger::build(Some("crit"), config(Some(dir.path().to_path_buf()))).expect("build");

        logger.critical("on fire");
        logger.flush().expect("flush");

        let contents = std::fs::read_to_string(dir.path().join("crit.log")).expect("read");
        assert!(
            contents.contains("[CRITICAL][crit][logger.rs:"),
            "{contents}"
        );
        assert!(contents.trim_end().ends_with("] on fire"));
    }

    #[test]
    fn ignores_the_ambient_subscriber() {
        let dir = TempDir::new().expect("temp dir");
        let logger =
            Logger::build(Some("ambient"), config(Some(dir.path().to_path_buf()))).expect("build");
        let ambient =
            tracing_subscriber::registry().with(tracing_subscriber::filter::LevelFilter::ERROR);

        tracing::subscriber::with_default(ambient, || logger.info("still written"));

        let contents = std::fs::read_to_string(dir.path().join("ambient.log")).expect("read");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("[INFO][ambient]"));
    }
}

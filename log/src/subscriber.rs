//! Using a configured [`Logger`] as the `tracing` subscriber.
//!
//! Code instrumented with `tracing` macros then writes through the same
//! sinks, line layout and threshold as the logger. `TRACE` events count as
//! `DEBUG`, and `ERROR` events under [`CRITICAL_TARGET`] as `CRITICAL`.
//!
//! [`CRITICAL_TARGET`]: crate::level::CRITICAL_TARGET

use crate::logger::Logger;
use tracing::dispatcher::{self, DefaultGuard, SetGlobalDefaultError};

/// Install `logger` as the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init(logger: &Logger) -> Result<(), SetGlobalDefaultError> {
    dispatcher::set_global_default(logger.dispatch().clone())
}

/// Make `logger` the subscriber of the current thread until the guard drops.
pub fn set_default(logger: &Logger) -> DefaultGuard {
    dispatcher::set_default(logger.dispatch())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        level::{Level, Threshold, CRITICAL_TARGET},
        options::{ResolvedConfig, SourceDisplay},
    };
    use tempfile::TempDir;

    fn file_logger(dir: &TempDir, threshold: Level) -> Logger {
        Logger::build(
            Some("bridge"),
            ResolvedConfig {
                threshold: Threshold::from(threshold),
                console: false,
                file_dir: Some(dir.path().to_path_buf()),
                source_display: SourceDisplay::Filename,
                max_file_bytes: 0,
                max_rotations: 2,
            },
        )
        .expect("build logger")
    }

    #[test]
    fn forwards_events_with_fields() {
        let dir = TempDir::new().expect("temp dir");
        let logger = file_logger(&dir, Level::Info);

        {
            let _guard = set_default(&logger);
            tracing::debug!("too quiet");
            tracing::warn!(attempt = 3, host = "db", "retrying");
        }

        let contents =
            std::fs::read_to_string(logger.file_path().expect("file sink")).expect("read");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("[WARNING][bridge][subscriber.rs:"));
        assert!(contents.contains("retrying attempt=3 host=db"));
    }

    #[test]
    fn critical_target_maps_to_critical() {
        let dir = TempDir::new().expect("temp dir");
        let logger = file_logger(&dir, Level::Critical);

        {
            let _guard = set_default(&logger);
            tracing::error!("plain error");
            tracing::error!(target: CRITICAL_TARGET, "meltdown");
        }

        let contents =
            std::fs::read_to_string(logger.file_path().expect("file sink")).expect("read");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("[CRITICAL][bridge]"));
        assert!(contents.contains("meltdown"));
    }
}

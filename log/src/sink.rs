//! Destinations for formatted lines.
//!
//! Every sink is a `tracing_subscriber::fmt` layer using the logger's
//! [`LineFormat`], filtered by the logger's threshold.

use crate::{
    format::LineFormat,
    level::{Level, Threshold},
    rotating::RotatingFileWriter,
};
use std::{io, path::PathBuf};
use tracing::Metadata;
use tracing_subscriber::{
    filter::{filter_fn, FilterFn},
    fmt, Layer, Registry,
};

/// A sink layer of a logger's subscriber.
pub type SinkLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File(PathBuf),
}

/// Writes to stderr.
pub fn console_layer(format: LineFormat, threshold: Threshold) -> SinkLayer {
    fmt::layer()
        .event_format(format)
        .with_writer(io::stderr)
        .with_filter(threshold_filter(threshold))
        .boxed()
}

/// Writes to a size-rotated file.
pub fn file_layer(
    format: LineFormat,
    threshold: Threshold,
    writer: RotatingFileWriter,
) -> SinkLayer {
    fmt::layer()
        .event_format(format)
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(threshold_filter(threshold))
        .boxed()
}

/// Lets through events whose [`Level::of`] meets `threshold`.
pub fn threshold_filter(
    threshold: Threshold,
) -> FilterFn<impl Fn(&Metadata<'_>) -> bool + Clone + Send + Sync + 'static> {
    filter_fn(move |metadata| threshold.allows(Level::of(metadata)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{level::CRITICAL_TARGET, options::SourceDisplay};
    use tempfile::TempDir;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn file_layer_filters_by_threshold() {
        let dir = TempDir::new().expect("temp dir");
        let writer = RotatingFileWriter::open(dir.path(), "svc", 0, 2).expect("open");
        let layer = file_layer(
            LineFormat::new(Some("svc"), SourceDisplay::None),
            Threshold::from(Level::Error),
            writer.clone(),
        );
        let subscriber = tracing_subscriber::registry().with(vec![layer]);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("dropped");
            tracing::error!("kept");
            tracing::error!(target: CRITICAL_TARGET, "also kept");
        });

        let contents = std::fs::read_to_string(writer.path()).expect("read");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[ERROR][svc] kept"));
        assert!(lines[1].ends_with("[CRITICAL][svc] also kept"));
    }

    #[test]
    fn ordinal_threshold_between_levels() {
        let dir = TempDir::new().expect("temp dir");
        let writer = RotatingFileWriter::open(dir.path(), "svc", 0, 2).expect("open");
        let layer = file_layer(
            LineFormat::new(None, SourceDisplay::None),
            Threshold(45),
            writer.clone(),
        );
        let subscriber = tracing_subscriber::registry().with(vec![layer]);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("below 45");
            tracing::error!(target: CRITICAL_TARGET, "above 45");
        });

        let contents = std::fs::read_to_string(writer.path()).expect("read");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("above 45"));
    }
}

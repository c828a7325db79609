//! Line layout shared by every sink of a logger.
//!
//! A line is `[timestamp][LEVEL][name][source:line] message`. The name and
//! source fields are only part of the layout when they apply; there are no
//! empty brackets. [`LineFormat`] is the event formatter of each sink's
//! `tracing_subscriber::fmt` layer.

use crate::{level::Level, options::SourceDisplay};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::{
    borrow::Cow,
    collections::HashMap,
    env,
    fmt::{self, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{
    field::{Field as EventField, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Event field carrying the caller's source file, overriding the callsite's.
pub const FILE_FIELD: &str = "log.file";
/// Event field carrying the caller's source line, overriding the callsite's.
pub const LINE_FIELD: &str = "log.line";

/// A single log call.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: Level,
    pub message: &'a str,
    pub file: &'a str,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Timestamp,
    Level,
    Name(String),
    Source(SourceDisplay),
}

#[derive(Debug, Clone)]
pub struct LineFormat {
    fields: Vec<Field>,
    /// Compile-time paths already looked up on disk, shared between clones.
    resolved: Arc<Mutex<HashMap<String, Option<PathBuf>>>>,
}

impl LineFormat {
    pub fn new(name: Option<&str>, source_display: SourceDisplay) -> Self {
        let mut fields = vec![Field::Timestamp, Field::Level];
        if let Some(name) = name {
            fields.push(Field::Name(name.to_string()));
        }
        if source_display != SourceDisplay::None {
            fields.push(Field::Source(source_display));
        }
        Self {
            fields,
            resolved: Arc::default(),
        }
    }

    pub fn has_name(&self) -> bool {
        self.fields.iter().any(|f| matches!(f, Field::Name(_)))
    }

    pub fn has_source(&self) -> bool {
        self.fields.iter().any(|f| matches!(f, Field::Source(_)))
    }

    /// Render without a trailing newline.
    pub fn render(&self, record: &Record<'_>) -> String {
        self.render_at(record, Local::now())
    }

    pub fn render_at(&self, record: &Record<'_>, now: DateTime<Local>) -> String {
        let mut out = String::with_capacity(64 + record.message.len());
        for field in &self.fields {
            // Writing into a String cannot fail.
            let _ = match field {
                Field::Timestamp => write!(out, "[{}]", now.format(TIMESTAMP_FORMAT)),
                Field::Level => write!(out, "[{}]", record.level.name()),
                Field::Name(name) => write!(out, "[{name}]"),
                Field::Source(mode) => {
                    write!(
                        out,
                        "[{}:{}]",
                        self.source_path(record.file, *mode),
                        record.line
                    )
                }
            };
        }
        out.push(' ');
        out.push_str(record.message);
        out
    }

    fn source_path<'a>(&self, file: &'a str, mode: SourceDisplay) -> Cow<'a, str> {
        let path = Path::new(file);
        match mode {
            SourceDisplay::FullPath => {
                let mut resolved = self.resolved.lock();
                let found = resolved
                    .entry(file.to_string())
                    .or_insert_with(|| locate_source(path));
                match found {
                    Some(found) => Cow::Owned(found.display().to_string()),
                    None => Cow::Borrowed(file),
                }
            }
            SourceDisplay::Filename | SourceDisplay::None => path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or(Cow::Borrowed(file)),
        }
    }
}

/// Find the file a compile-time source path refers to.
///
/// Those paths are relative to the root of the build, which is the working
/// directory or one of its ancestors when run through cargo. `None` if no
/// candidate exists on disk.
fn locate_source(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return path.canonicalize().ok();
    }
    let cwd = env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
        .and_then(|found| found.canonicalize().ok())
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message();
        let record = Record {
            level: Level::of(metadata),
            message: &message,
            file: visitor
                .file
                .as_deref()
                .or(metadata.file())
                .unwrap_or(metadata.target()),
            line: visitor.line.or(metadata.line()).unwrap_or(0),
        };
        writeln!(writer, "{}", self.render(&record))
    }
}

/// Collects the message, the caller location fields, and any other fields
/// as trailing `key=value` pairs.
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
    file: Option<String>,
    line: Option<u32>,
}

impl EventVisitor {
    fn message(&self) -> Cow<'_, str> {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => Cow::Borrowed(&self.message),
            (true, false) => Cow::Borrowed(&self.fields),
            (false, false) => Cow::Owned(format!("{} {}", self.message, self.fields)),
        }
    }

    fn push_field(&mut self, field: &EventField, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &EventField, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            FILE_FIELD => self.file = Some(value.to_string()),
            _ => self.push_field(field, format_args!("{value}")),
        }
    }

    fn record_u64(&mut self, field: &EventField, value: u64) {
        match field.name() {
            LINE_FIELD => self.line = u32::try_from(value).ok(),
            _ => self.push_field(field, format_args!("{value}")),
        }
    }

    fn record_debug(&mut self, field: &EventField, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            _ => self.push_field(field, format_args!("{value:?}")),
        }
    }
}

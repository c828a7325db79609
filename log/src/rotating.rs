//! Size-rotated log files, written through `flexi_logger`'s file writer.
//!
//! The active file is `{stem}.log`. Once it grows past `max_bytes` it is
//! renamed to the next generation, `{stem}_r00000.log`, `{stem}_r00001.log`
//! and so on, and a fresh active file is started. Only the newest
//! `max_rotations` generations are kept.

use flexi_logger::{
    writers::{ArcFileLogWriter, FileLogWriter, FileLogWriterHandle},
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Naming, WriteMode,
};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::fmt::MakeWriter;

/// Shared handle to a size-rotated log file.
///
/// Each `write` call is treated as one record, so this works as the writer
/// of a `tracing_subscriber::fmt` layer, which writes each formatted event in
/// a single call.
#[derive(Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<ArcFileLogWriter>>,
    _handle: Arc<FileLogWriterHandle>,
    path: PathBuf,
}

impl RotatingFileWriter {
    /// Append to `{dir}/{stem}.log`. `max_bytes == 0` never rotates.
    pub fn open(
        dir: &Path,
        stem: &str,
        max_bytes: u64,
        max_rotations: usize,
    ) -> Result<Self, FlexiLoggerError> {
        let spec = FileSpec::default()
            .directory(dir)
            .basename(stem)
            .suffix("log")
            .suppress_timestamp();

        let mut builder = FileLogWriter::builder(spec)
            .append()
            .write_mode(WriteMode::Direct)
            .cleanup_in_background_thread(false);
        if max_bytes > 0 {
            builder = builder.rotate(
                Criterion::Size(max_bytes),
                Naming::NumbersDirect,
                Cleanup::KeepLogFiles(max_rotations),
            );
        }

        let (writer, handle) = builder.try_build_with_handle()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(writer)),
            _handle: Arc::new(handle),
            path: dir.join(format!("{stem}.log")),
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

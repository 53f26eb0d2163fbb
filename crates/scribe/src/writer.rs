//! Thread-safe log writer facade.
//!
//! # Architecture
//!
//! ```text
//! caller → severity gate → lock → rotation check → format → append → unlock
//! ```
//!
//! A [`LogWriter`] owns its [`FileState`] and a [`RecordFormatter`] behind a
//! single mutex. Every write, including any rotation it triggers, runs inside
//! that lock, so records appear in the file in lock acquisition order and a
//! record never spans two files.
//!
//! Writes never fail from the caller's point of view. I/O errors on the write
//! path are counted in [`WriterStats::failed_writes`] and otherwise dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use alopex_scribe::{info, LogWriter, LogWriterConfig};
//!
//! let writer = LogWriter::open(
//!     LogWriterConfig::new("logs/app.log")
//!         .with_max_file_size_kb(10_000)
//!         .with_max_files(5),
//! )?;
//! info!(writer, "listening on {}", addr);
//! ```

use crate::error::Result;
use crate::file::{FileLimits, FileState, LogPath};
use crate::level::{Level, LevelFilter};
use crate::record::{current_thread_id, BrokenDownTime, Record, RecordFormatter};
use std::cell::RefCell;
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, warn};

/// Bytes per configured kilobyte.
pub const BYTES_PER_KB: u64 = 1000;

/// Default scratch buffer capacity for record encoding.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 512;

/// Configuration for a [`LogWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWriterConfig {
    /// Path of the active log file.
    pub path: PathBuf,
    /// Maximum size of one file in kilobytes; 0 disables rotation.
    pub max_file_size_kb: u64,
    /// Maximum number of retained files; 0 disables rotation. Negative
    /// values are a programming error and abort the process in
    /// [`LogWriter::open`].
    pub max_files: i32,
    /// Write buffer size in kilobytes; `None` or 0 writes straight through.
    pub buffer_size_kb: Option<usize>,
    /// Pre-allocate each fresh active file to the maximum file size.
    pub pre_extend: bool,
    /// Runtime minimum level, applied on top of the build-time minimum.
    pub min_level: LevelFilter,
}

impl LogWriterConfig {
    /// Creates an unbounded, unbuffered configuration for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_file_size_kb: 0,
            max_files: 0,
            buffer_size_kb: None,
            pre_extend: false,
            min_level: LevelFilter::Trace,
        }
    }

    /// Sets the maximum file size in kilobytes.
    pub fn with_max_file_size_kb(mut self, max_file_size_kb: u64) -> Self {
        self.max_file_size_kb = max_file_size_kb;
        self
    }

    /// Sets the maximum number of retained files.
    pub fn with_max_files(mut self, max_files: i32) -> Self {
        self.max_files = max_files;
        self
    }

    /// Sets the write buffer size in kilobytes.
    pub fn with_buffer_size_kb(mut self, buffer_size_kb: usize) -> Self {
        self.buffer_size_kb = Some(buffer_size_kb);
        self
    }

    /// Enables or disables pre-extension of fresh files.
    pub fn with_pre_extend(mut self, pre_extend: bool) -> Self {
        self.pre_extend = pre_extend;
        self
    }

    /// Sets the runtime minimum level.
    pub fn with_min_level(mut self, min_level: LevelFilter) -> Self {
        self.min_level = min_level;
        self
    }

    /// Maximum file size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb.saturating_mul(BYTES_PER_KB)
    }

    /// Write buffer capacity in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_size_kb
            .unwrap_or(0)
            .saturating_mul(BYTES_PER_KB as usize)
    }
}

/// Counters describing a writer's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterStats {
    /// Estimated bytes in the active file.
    pub size_estimate: u64,
    /// Rotations performed.
    pub rotations: u64,
    /// Records handed to the file.
    pub records_written: u64,
    /// Records lost to I/O errors.
    pub failed_writes: u64,
}

#[derive(Debug)]
struct WriterInner {
    file: FileState,
    formatter: RecordFormatter,
    rotations: u64,
    records_written: u64,
    failed_writes: u64,
}

impl WriterInner {
    fn write_record(&mut self, record: &Record<'_>, thread_id: u64) {
        let record_size = record.estimated_size() as u64;

        if self.file.needs_rotation(record_size) {
            self.rotations += 1;
            if let Err(e) = self.file.rotate() {
                warn!(
                    "Failed to reopen log file {} after rotation: {:?}",
                    self.file.path().primary().display(),
                    e
                );
            }
        }
        self.file.account(record_size);

        let time = BrokenDownTime::now();
        let bytes = self.formatter.format(record, &time, thread_id);
        match self.file.append(bytes) {
            Ok(()) => self.records_written += 1,
            Err(e) => {
                if self.failed_writes == 0 {
                    warn!(
                        "Dropping log records for {}: {:?}",
                        self.file.path().primary().display(),
                        e
                    );
                }
                self.failed_writes += 1;
            }
        }
    }
}

/// Size-bounded, rotating, thread-safe log file writer.
///
/// Share it between threads with `Arc<LogWriter>` or a `&'static` reference.
/// Dropping the writer flushes and closes the active file; callers must make
/// sure no other thread is still writing at that point.
#[derive(Debug)]
pub struct LogWriter {
    path: LogPath,
    min_level: AtomicU8,
    inner: Mutex<WriterInner>,
}

impl LogWriter {
    /// Opens a writer with the given configuration.
    ///
    /// # Aborts
    ///
    /// Aborts the process if `config.max_files` is negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid, its directory cannot be
    /// created or the active file cannot be opened.
    pub fn open(config: LogWriterConfig) -> Result<Self> {
        if config.max_files < 0 {
            let message = format!(
                "LogWriter max_files must not be negative, got {}",
                config.max_files
            );
            // No subscriber may be installed; stderr is the only sure channel.
            error!("{}", message);
            eprintln!("{message}");
            std::process::abort();
        }

        let path = LogPath::new(&config.path)?;
        let limits = FileLimits {
            max_file_size: config.max_file_size_bytes(),
            max_files: config.max_files as u32,
        };
        let file = FileState::open(
            path.clone(),
            limits,
            config.buffer_capacity(),
            config.pre_extend,
        )?;

        Ok(Self {
            path,
            min_level: AtomicU8::new(config.min_level as u8),
            inner: Mutex::new(WriterInner {
                file,
                formatter: RecordFormatter::with_capacity(DEFAULT_SCRATCH_CAPACITY),
                rotations: 0,
                records_written: 0,
                failed_writes: 0,
            }),
        })
    }

    /// Opens an unbuffered writer from a path, a size limit in kilobytes
    /// and a file count.
    ///
    /// # Aborts
    ///
    /// Aborts the process if `max_files` is negative.
    pub fn init(path: impl Into<PathBuf>, max_file_size_kb: u64, max_files: i32) -> Result<Self> {
        Self::open(
            LogWriterConfig::new(path)
                .with_max_file_size_kb(max_file_size_kb)
                .with_max_files(max_files),
        )
    }

    fn lock(&self) -> MutexGuard<'_, WriterInner> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Current runtime minimum level.
    pub fn min_level(&self) -> LevelFilter {
        match self.min_level.load(Ordering::Relaxed) {
            0 => LevelFilter::Trace,
            1 => LevelFilter::Debug,
            2 => LevelFilter::Info,
            3 => LevelFilter::Warning,
            4 => LevelFilter::Error,
            5 => LevelFilter::Fatal,
            _ => LevelFilter::Off,
        }
    }

    /// Changes the runtime minimum level.
    pub fn set_min_level(&self, min_level: LevelFilter) {
        self.min_level.store(min_level as u8, Ordering::Relaxed);
    }

    /// Returns true if records at `level` pass both the build-time and the
    /// runtime gate.
    #[inline(always)]
    pub fn enabled(&self, level: Level) -> bool {
        level.is_enabled_static() && self.min_level().allows(level)
    }

    /// Writes a record if `level` is enabled.
    #[inline]
    pub fn log(&self, level: Level, line: u32, function: &str, source: &str, message: &str) {
        if self.enabled(level) {
            self.write(level, line, function, source, message);
        }
    }

    /// Writes a record with a formatted message if `level` is enabled.
    ///
    /// Messages without arguments are written without copying; others are
    /// rendered into a per-thread buffer that is reused across calls.
    pub fn log_fmt(
        &self,
        level: Level,
        line: u32,
        function: &str,
        source: &str,
        args: fmt::Arguments<'_>,
    ) {
        if !self.enabled(level) {
            return;
        }
        if let Some(message) = args.as_str() {
            self.write(level, line, function, source, message);
            return;
        }

        thread_local! {
            static MESSAGE: RefCell<String> = const { RefCell::new(String::new()) };
        }
        MESSAGE.with(|cell| match cell.try_borrow_mut() {
            Ok(mut message) => {
                message.clear();
                let _ = message.write_fmt(args);
                self.write(level, line, function, source, &message);
            }
            // A Display impl inside `args` is logging through this thread.
            Err(_) => self.write(level, line, function, source, &args.to_string()),
        });
    }

    /// Writes a record unconditionally.
    ///
    /// Severity gating is the caller's job; see [`LogWriter::log`].
    pub fn write(&self, level: Level, line: u32, function: &str, source: &str, message: &str) {
        self.write_record(&Record::new(level, line, function, source, message));
    }

    /// Writes a prepared record unconditionally.
    pub fn write_record(&self, record: &Record<'_>) {
        let thread_id = current_thread_id();
        self.lock().write_record(record, thread_id);
    }

    /// Pushes buffered records to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered bytes cannot be written.
    pub fn flush(&self) -> Result<()> {
        self.lock().file.flush()?;
        Ok(())
    }

    /// Estimated bytes in the active file.
    pub fn size_estimate(&self) -> u64 {
        self.lock().file.size_estimate()
    }

    /// Snapshot of the writer's counters.
    pub fn stats(&self) -> WriterStats {
        let inner = self.lock();
        WriterStats {
            size_estimate: inner.file.size_estimate(),
            rotations: inner.rotations,
            records_written: inner.records_written,
            failed_writes: inner.failed_writes,
        }
    }

    /// Naming parts of the file set.
    pub fn log_path(&self) -> &LogPath {
        &self.path
    }

    /// Path of the active file.
    pub fn path(&self) -> PathBuf {
        self.path.primary()
    }

    /// Path of the file at `index` in the rotated set.
    pub fn file_path(&self, index: u32) -> PathBuf {
        self.path.file_name(index)
    }
}

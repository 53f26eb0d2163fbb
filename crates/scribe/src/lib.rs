//! Scribe - Alopex append-only text log writer
//!
//! This crate renders structured log records into fixed-layout text lines
//! and appends them to a size-bounded, automatically rotating set of files.
//!
//! # Components
//!
//! - [`RecordFormatter`]: Allocation-free record encoding into a reused buffer
//! - [`FileState`]: Active file, size estimate and limits
//! - [`LogWriter`]: Thread-safe facade composing rotation and formatting
//! - [`Level`] / [`LevelFilter`]: Severity gate, fixed at build time and
//!   adjustable at runtime
//!
//! # Example
//!
//! ```rust,ignore
//! use alopex_scribe::{info, LogWriter};
//!
//! // At most 3 files of 10 MB each: app.log, app.1.log, app.2.log
//! let writer = LogWriter::init("logs/app.log", 10_000, 3)?;
//!
//! info!(writer, "replayed {} WAL entries", count);
//! writer.flush()?;
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod file;
pub mod level;
mod macros;
pub mod record;
pub mod writer;

pub use error::{Result, ScribeError};
pub use file::rotation::RotationOutcome;
pub use file::{FileLimits, FileState, LogPath};
pub use level::{Level, LevelFilter, STATIC_MIN_LEVEL};
pub use record::{BrokenDownTime, Record, RecordFormatter};
pub use writer::{LogWriter, LogWriterConfig, WriterStats};

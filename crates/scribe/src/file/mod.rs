//! Active log file state and rotated file naming.
//!
//! # File Set
//!
//! ```text
//! logs/app.log      index 0, always the active file
//! logs/app.1.log    previous active file
//! logs/app.2.log    ...
//! logs/app.{N-1}.log  oldest retained file (N = max_files)
//! ```
//!
//! A path without an extension is numbered as `app`, `app.1`, `app.2`.

pub mod rotation;

use crate::error::{Result, ScribeError};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Naming parts of a rotated file set: stem (including directory) and
/// extension (without the leading dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPath {
    stem: PathBuf,
    extension: Option<OsString>,
}

impl LogPath {
    /// Splits `path` into stem and extension.
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::InvalidPath`] if the path has no file name.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(ScribeError::InvalidPath(path.to_path_buf()));
        }

        Ok(Self {
            stem: path.with_extension(""),
            extension: path.extension().map(|ext| ext.to_os_string()),
        })
    }

    /// Path of the file at `index`; index 0 is the active file.
    pub fn file_name(&self, index: u32) -> PathBuf {
        let mut name = self.stem.clone().into_os_string();
        if index > 0 {
            name.push(".");
            name.push(index.to_string());
        }
        if let Some(ext) = &self.extension {
            name.push(".");
            name.push(ext);
        }
        PathBuf::from(name)
    }

    /// Path of the active file.
    pub fn primary(&self) -> PathBuf {
        self.file_name(0)
    }

    /// Directory holding the file set, if the path names one.
    pub fn directory(&self) -> Option<&Path> {
        self.stem
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}

/// Size and count limits of a file set, in bytes and files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLimits {
    /// Maximum size of one file in bytes; 0 means unbounded.
    pub max_file_size: u64,
    /// Maximum number of retained files; 0 means unbounded.
    pub max_files: u32,
}

impl FileLimits {
    /// Rotation happens only when both limits are set.
    #[inline]
    pub fn rotation_enabled(&self) -> bool {
        self.max_file_size > 0 && self.max_files > 0
    }
}

/// The open active file, its size estimate and its limits.
///
/// At most one file handle is held. The handle is absent only when a
/// rotation could not reopen the active file; writes fail until the next
/// rotation succeeds.
#[derive(Debug)]
pub struct FileState {
    path: LogPath,
    stream: Option<BufWriter<File>>,
    size_estimate: u64,
    limits: FileLimits,
    buffer_capacity: usize,
    pre_extend: bool,
    /// The active file carries a pre-allocated tail that must be trimmed on close.
    extended: bool,
}

impl FileState {
    /// Opens the active file of `path` for appending.
    ///
    /// Missing parent directories are created. The size of an existing file
    /// becomes the starting size estimate; a missing file counts as empty.
    /// A `buffer_capacity` of zero writes straight through to the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be opened.
    pub fn open(
        path: LogPath,
        limits: FileLimits,
        buffer_capacity: usize,
        pre_extend: bool,
    ) -> Result<Self> {
        if let Some(dir) = path.directory() {
            fs::create_dir_all(dir).map_err(|source| ScribeError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let primary = path.primary();
        let mut existing_size = match fs::metadata(&primary) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        // Not opened in append mode: append-mode writes would land after a
        // pre-extension sentinel instead of at the write position.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&primary)?;

        // A process that died while a file was pre-extended leaves a zero tail.
        if pre_extend && existing_size > 0 {
            let written = written_length(&mut file, existing_size)?;
            if written < existing_size {
                debug!(
                    "Trimming {} bytes of pre-allocated tail from {}",
                    existing_size - written,
                    primary.display()
                );
                file.set_len(written)?;
                existing_size = written;
            }
        }
        file.seek(SeekFrom::Start(existing_size))?;

        let mut state = Self {
            path,
            stream: None,
            size_estimate: existing_size,
            limits,
            buffer_capacity,
            pre_extend,
            extended: false,
        };
        state.extended = state.extend(&mut file, existing_size)?;
        state.stream = Some(BufWriter::with_capacity(buffer_capacity, file));

        debug!(
            "Opened log file {} (existing size {} bytes)",
            primary.display(),
            existing_size
        );
        Ok(state)
    }

    /// Grows `file` to the maximum file size and returns the write position
    /// to `resume_at`. Returns whether the file was extended.
    fn extend(&self, file: &mut File, resume_at: u64) -> io::Result<bool> {
        if !self.pre_extend
            || !self.limits.rotation_enabled()
            || resume_at >= self.limits.max_file_size
        {
            return Ok(false);
        }

        file.seek(SeekFrom::Start(self.limits.max_file_size))?;
        file.write_all(&[0])?;
        file.seek(SeekFrom::Start(resume_at))?;
        Ok(true)
    }

    /// Flushes and closes the active file, trimming any pre-allocated tail.
    fn close(&mut self) -> io::Result<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        let extended = std::mem::replace(&mut self.extended, false);

        let mut file = stream.into_inner().map_err(|e| e.into_error())?;
        if extended {
            let end = file.stream_position()?;
            file.set_len(end)?;
        }
        Ok(())
    }

    /// Appends already-encoded bytes to the active file.
    pub fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "log file is not open",
            )),
        }
    }

    /// Pushes buffered bytes to the operating system.
    pub fn flush(&mut self) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.flush(),
            None => Ok(()),
        }
    }

    /// Adds a record's projected size to the estimate.
    #[inline]
    pub fn account(&mut self, record_size: u64) {
        self.size_estimate = self.size_estimate.saturating_add(record_size);
    }

    /// Approximate bytes written to the active file.
    pub fn size_estimate(&self) -> u64 {
        self.size_estimate
    }

    /// Configured limits.
    pub fn limits(&self) -> FileLimits {
        self.limits
    }

    /// Naming parts of the file set.
    pub fn path(&self) -> &LogPath {
        &self.path
    }

    /// Returns true while a file handle is held.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Length of `file` without its trailing zero bytes.
///
/// Every record ends with a newline, so zeros past the last record can only
/// be pre-allocated space.
fn written_length(file: &mut File, len: u64) -> io::Result<u64> {
    let mut chunk = [0u8; 4096];
    let mut end = len;
    while end > 0 {
        let start = end.saturating_sub(chunk.len() as u64);
        let buf = &mut chunk[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(buf)?;
        match buf.iter().rposition(|&byte| byte != 0) {
            Some(pos) => return Ok(start + pos as u64 + 1),
            None => end = start,
        }
    }
    Ok(0)
}

impl Drop for FileState {
    fn drop(&mut self) {
        // Best effort to flush remaining records
        if let Err(e) = self.close() {
            warn!(
                "Failed to close log file {}: {:?}",
                self.path.primary().display(),
                e
            );
        }
    }
}

//! Size-triggered rotation of the active log file.
//!
//! Rotation runs synchronously inside the writer's critical section: the
//! active file is closed, every retained file is renamed one index up
//! (oldest first, so the file at `max_files - 1` is overwritten and
//! discarded), and a fresh, empty active file is opened. Rename failures are
//! skipped; a missing file simply leaves a gap in the chain.

use super::FileState;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use tracing::{debug, warn};

/// Summary of one rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationOutcome {
    /// Files moved one index up.
    pub renamed: u32,
    /// Renames skipped because the source file did not exist.
    pub missing: u32,
    /// Renames that failed for another reason.
    pub failed: u32,
}

impl FileState {
    /// Returns true if appending `record_size` bytes must rotate first.
    #[inline]
    pub fn needs_rotation(&self, record_size: u64) -> bool {
        self.limits.rotation_enabled()
            && self.size_estimate.saturating_add(record_size) > self.limits.max_file_size
    }

    /// Rotates the file set and opens a fresh active file.
    ///
    /// The size estimate is reset even if reopening fails; in that case no
    /// file is held until the next rotation succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fresh active file cannot be opened or
    /// pre-extended. Close and rename failures are logged and skipped.
    pub fn rotate(&mut self) -> io::Result<RotationOutcome> {
        if let Err(e) = self.close() {
            warn!(
                "Failed to close log file {} before rotation: {:?}",
                self.path.primary().display(),
                e
            );
        }

        let mut outcome = RotationOutcome::default();
        for index in (0..self.limits.max_files.saturating_sub(1)).rev() {
            let from = self.path.file_name(index);
            let to = self.path.file_name(index + 1);
            match fs::rename(&from, &to) {
                Ok(()) => outcome.renamed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => outcome.missing += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        "Failed to rename {} to {}: {:?}",
                        from.display(),
                        to.display(),
                        e
                    );
                }
            }
        }
        self.size_estimate = 0;

        let primary = self.path.primary();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&primary)?;
        self.extended = self.extend(&mut file, 0)?;
        self.stream = Some(BufWriter::with_capacity(self.buffer_capacity, file));

        debug!(
            "Rotated log file {} ({} renamed, {} missing, {} failed)",
            primary.display(),
            outcome.renamed,
            outcome.missing,
            outcome.failed
        );
        Ok(outcome)
    }
}

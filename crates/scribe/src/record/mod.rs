//! Record encoding.
//!
//! A record is rendered into one newline-terminated line with a fixed layout:
//!
//! ```text
//! [YYYY-MM-DD HH:MM:SS][ttttttttHHHH][sev  ][function]@(source,line) message\n
//! ```
//!
//! The fixed prefix is copied from a zero-filled skeleton and the numeric
//! fields are then encoded right-to-left over the placeholders, so leading
//! zeros come from the skeleton and not from the encoder. Everything is
//! written into a single scratch buffer that the formatter keeps between
//! calls; once it has grown to fit the longest record seen, formatting does
//! not allocate.

pub mod thread;
pub mod time;

pub use thread::current_thread_id;
pub use time::{BrokenDownTime, MAX_YEAR};

use crate::level::Level;

/// Byte length of the fixed parts of a record: brackets, timestamp, thread
/// id, severity token, location punctuation, separator and newline.
pub const RECORD_OVERHEAD: usize = 50;

/// Number of hexadecimal digits rendered for the thread id.
pub const THREAD_ID_WIDTH: usize = 12;

/// Separator between the location suffix and the message.
pub const RECORD_SEPARATOR: u8 = b' ';

/// Everything up to and including the bracket opening the function name.
const PREFIX_SKELETON: &[u8; PREFIX_LEN] = b"[0000-00-00 00:00:00][000000000000][     ][";
const PREFIX_LEN: usize = 43;

// Field positions inside PREFIX_SKELETON, as (start, end) byte ranges.
const YEAR: (usize, usize) = (1, 5);
const MONTH: (usize, usize) = (6, 8);
const DAY: (usize, usize) = (9, 11);
const HOUR: (usize, usize) = (12, 14);
const MINUTE: (usize, usize) = (15, 17);
const SECOND: (usize, usize) = (18, 20);
const THREAD: (usize, usize) = (22, 22 + THREAD_ID_WIDTH);
const LEVEL: (usize, usize) = (36, 41);

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// One log event, borrowed from the call site for the duration of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Severity.
    pub level: Level,
    /// Source line number.
    pub line: u32,
    /// Name of the calling function.
    pub function: &'a str,
    /// Short name of the source file.
    pub source: &'a str,
    /// Free-text message.
    pub message: &'a str,
}

impl<'a> Record<'a> {
    /// Creates a record.
    #[inline]
    pub fn new(
        level: Level,
        line: u32,
        function: &'a str,
        source: &'a str,
        message: &'a str,
    ) -> Self {
        Self {
            level,
            line,
            function,
            source,
            message,
        }
    }

    /// Byte length of the variable fields.
    #[inline]
    pub fn dynamic_size(&self) -> usize {
        self.function.len() + self.source.len() + decimal_len(self.line) + self.message.len()
    }

    /// Projected size of the rendered record.
    #[inline]
    pub fn estimated_size(&self) -> usize {
        estimate_record_size(self.dynamic_size())
    }
}

/// Projected size of a record from the length of its variable fields.
///
/// For this layout the projection is exact whenever the fields are passed
/// through unchanged, which they always are.
#[inline]
pub const fn estimate_record_size(dynamic_size: usize) -> usize {
    RECORD_OVERHEAD + dynamic_size
}

/// Renders records into a reusable scratch buffer.
#[derive(Debug, Default)]
pub struct RecordFormatter {
    scratch: Vec<u8>,
}

impl RecordFormatter {
    /// Creates a formatter with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter whose scratch buffer can hold `capacity` bytes
    /// before it first needs to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Current capacity of the scratch buffer.
    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Renders `record` and returns the encoded line.
    ///
    /// The returned slice is valid until the next call.
    pub fn format(&mut self, record: &Record<'_>, time: &BrokenDownTime, thread_id: u64) -> &[u8] {
        let estimate = record.estimated_size();
        let buf = &mut self.scratch;
        buf.clear();
        buf.reserve(estimate);

        buf.extend_from_slice(PREFIX_SKELETON);
        {
            let prefix = &mut buf[..PREFIX_LEN];
            encode_decimal(
                &mut prefix[YEAR.0..YEAR.1],
                u64::from(time.year.min(MAX_YEAR)),
            );
            encode_decimal(&mut prefix[MONTH.0..MONTH.1], u64::from(time.month));
            encode_decimal(&mut prefix[DAY.0..DAY.1], u64::from(time.day));
            encode_decimal(&mut prefix[HOUR.0..HOUR.1], u64::from(time.hour));
            encode_decimal(&mut prefix[MINUTE.0..MINUTE.1], u64::from(time.minute));
            encode_decimal(&mut prefix[SECOND.0..SECOND.1], u64::from(time.second));
            encode_hex(&mut prefix[THREAD.0..THREAD.1], thread_id);
            prefix[LEVEL.0..LEVEL.1].copy_from_slice(record.level.token());
        }

        buf.extend_from_slice(record.function.as_bytes());
        buf.extend_from_slice(b"]@(");
        buf.extend_from_slice(record.source.as_bytes());
        buf.push(b',');

        let digits_start = buf.len();
        buf.resize(digits_start + decimal_len(record.line), b'0');
        encode_decimal(&mut buf[digits_start..], u64::from(record.line));

        buf.push(b')');
        buf.push(RECORD_SEPARATOR);
        buf.extend_from_slice(record.message.as_bytes());
        buf.push(b'\n');

        debug_assert_eq!(buf.len(), estimate);
        &self.scratch
    }
}

/// Writes the decimal digits of `value` right-aligned into `dst`.
///
/// Encoding stops once `value` reaches zero, so `dst` must already hold
/// `b'0'` placeholders. Digits that do not fit are dropped.
#[inline]
pub fn encode_decimal(dst: &mut [u8], mut value: u64) {
    let mut pos = dst.len();
    while value != 0 && pos > 0 {
        pos -= 1;
        dst[pos] = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

/// Writes the lowercase hexadecimal digits of `value` right-aligned into
/// `dst`. Same placeholder contract as [`encode_decimal`].
#[inline]
pub fn encode_hex(dst: &mut [u8], mut value: u64) {
    let mut pos = dst.len();
    while value != 0 && pos > 0 {
        pos -= 1;
        dst[pos] = HEX_DIGITS[(value & 0xf) as usize];
        value >>= 4;
    }
}

/// Number of decimal digits needed for `value` (at least one).
#[inline]
pub const fn decimal_len(value: u32) -> usize {
    if value == 0 {
        1
    } else {
        value.ilog10() as usize + 1
    }
}

/// Strips directories from a source path, accepting both `/` and `\`.
#[inline]
pub fn short_source_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

//! Bounded output buffers
//!
//! [`Sink`] is the append-only record buffer with sticky overflow.
//! [`TruncatingBuf`] is a `fmt::Write` adapter over a fixed slice that
//! silently truncates, used for numbers and the record header.

use std::fmt;

/// Fixed-capacity, append-only byte buffer with sticky overflow detection
///
/// One byte is always reserved for a trailing NUL so the contents can be
/// handed to C consumers unchanged. Once an append does not fit, the sink
/// refuses every later append until [`Sink::reset`].
#[derive(Debug, Clone)]
pub struct Sink {
    buf: Box<[u8]>,
    len: usize,
    overflow: bool,
}

impl Sink {
    /// Allocate a sink of `capacity` bytes, including the terminator
    pub fn new(capacity: usize) -> Self {
        let mut sink = Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            overflow: false,
        };
        sink.reset();
        sink
    }

    /// Clear contents and overflow state
    pub fn reset(&mut self) {
        self.len = 0;
        self.overflow = false;
        if let Some(first) = self.buf.first_mut() {
            *first = 0;
        }
    }

    /// Append `bytes` entirely or not at all
    pub fn append(&mut self, bytes: &[u8]) {
        if self.overflow || bytes.is_empty() {
            return;
        }
        if self.len + bytes.len() >= self.buf.len() {
            self.overflow = true;
            return;
        }
        let end = self.len + bytes.len();
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        self.buf[end] = 0;
    }

    /// Append the bytes of `text`
    pub fn append_text(&mut self, text: &str) {
        self.append(text.as_bytes());
    }

    /// Bytes written so far, without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Bytes written so far including the trailing NUL
    ///
    /// Empty only for a zero-capacity sink.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        let end = (self.len + 1).min(self.buf.len());
        &self.buf[..end]
    }

    /// Number of bytes written
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total buffer size including the reserved terminator
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Whether an append has been refused since the last reset
    pub const fn is_overflowed(&self) -> bool {
        self.overflow
    }
}

/// `fmt::Write` over a borrowed slice that drops whatever does not fit
///
/// Keeps at most `len - 1` bytes, mirroring `snprintf` which reserves the
/// last byte for its terminator. Never reports an error, so `write!` into
/// it always succeeds.
pub struct TruncatingBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> TruncatingBuf<'a> {
    /// Wrap `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Bytes kept so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn limit(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }
}

impl fmt::Write for TruncatingBuf<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit().saturating_sub(self.len);
        let take = s.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

//! StrBuf: append-only text builder over `Array<u8>`.
//!
//! The backing array always ends with a `0` byte that counts toward its
//! length, so the text is `len - 1` bytes and can be handed to C-style
//! consumers without copying. Every byte sequence written comes from a
//! `&str`, so the contents are always valid UTF-8. Appended text ends at its
//! first NUL byte, so the terminator is the only NUL in the buffer.

use crate::array::Array;
use crate::error::ContainerError;
use core::fmt;

pub struct StrBuf {
    data: Array<u8>,
}

/// Counts the bytes a formatting run would produce.
struct Measure(usize);

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Renders into a pre-sized, capacity-locked array.
struct Render<'a>(&'a mut Array<u8>);

impl fmt::Write for Render<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.addn(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl StrBuf {
    pub fn new() -> Result<Self, ContainerError> {
        Self::with_capacity(1)
    }

    /// Buffer with room for `capacity` bytes including the terminator.
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        let mut data = Array::with_capacity(capacity.max(1))?;
        data.add(0)?;
        Ok(Self { data })
    }

    pub fn clear(&mut self) {
        self.data.truncate(1);
        if let Ok(first) = self.data.get_mut(0) {
            *first = 0;
        }
    }

    pub fn append(&mut self, text: &str) -> Result<(), ContainerError> {
        self.append_bytes(text.as_bytes())
    }

    /// Callers pass UTF-8 only. The reservation happens before the
    /// terminator is touched, so a failure leaves the buffer unchanged.
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), ContainerError> {
        // NUL is ASCII, so cutting there keeps the UTF-8 valid.
        let bytes = match bytes.iter().position(|&b| b == 0) {
            Some(end) => &bytes[..end],
            None => bytes,
        };
        if bytes.is_empty() {
            return Ok(());
        }
        self.data.reserve(bytes.len())?;
        // The first new byte takes the terminator's slot.
        self.data.pop();
        self.data.addn(bytes)?;
        self.data.add(0)
    }

    /// Appends formatted text, e.g. `buf.append_fmt(format_args!("{}", x))`.
    ///
    /// The arguments are formatted twice: once to measure and once into an
    /// exactly sized scratch buffer. A `Display` impl that fails, or that
    /// writes more the second time, yields `FormatFailed` and the buffer is
    /// left unchanged.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), ContainerError> {
        let mut measure = Measure(0);
        fmt::write(&mut measure, args).map_err(|_| ContainerError::FormatFailed)?;
        let mut rendered = Array::with_capacity(measure.0)?;
        rendered.lock_capacity();
        fmt::write(&mut Render(&mut rendered), args).map_err(|_| ContainerError::FormatFailed)?;
        self.append_bytes(rendered.as_slice())
    }

    /// The text without its terminator.
    pub fn as_str(&self) -> &str {
        let bytes = &self.data.as_slice()[..self.len()];
        // SAFETY: only `&str` contents are ever appended.
        unsafe { core::str::from_utf8_unchecked(bytes) }
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Length of the text in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Consumes the buffer and returns its text, reusing the backing
    /// allocation.
    pub fn into_string(self) -> String {
        let mut bytes = self.into_bytes_with_nul();
        bytes.pop();
        // SAFETY: only `&str` contents are ever appended.
        unsafe { String::from_utf8_unchecked(bytes) }
    }

    /// Consumes the buffer and returns the backing bytes, terminator included.
    pub fn into_bytes_with_nul(mut self) -> Vec<u8> {
        self.data.orphan_data()
    }
}

impl fmt::Write for StrBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map_err(|_| fmt::Error)
    }
}

impl fmt::Display for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

//! Deterministic byte stream writer for the symbolic class-unit format.
//!
//! The [`Writer`] is the encoding counterpart of [`crate::file::Parser`]. It only
//! appends; there is no seeking and no padding, so a given sequence of writes
//! always yields the same bytes. The pipeline's auditability rests on that
//! property.

use crate::Result;

/// An append-only binary writer for emitting class-unit structures.
///
/// All multi-byte integers are written big-endian; strings are written as a
/// `u16` length prefix followed by UTF-8 bytes. Strings longer than
/// `u16::MAX` bytes cannot be represented in the wire format and are rejected.
///
/// # Examples
///
/// ```rust
/// use classweave::file::Writer;
///
/// let mut writer = Writer::new();
/// writer.write_u8(0x01);
/// writer.write_str("avm_log")?;
/// assert_eq!(writer.into_bytes(), vec![0x01, 0x00, 0x07, b'a', b'v', b'm', b'_', b'l', b'o', b'g']);
/// # Ok::<(), classweave::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    /// Create a new, empty [`Writer`].
    #[must_use]
    pub fn new() -> Self {
        Writer { buffer: Vec::new() }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Append a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Append raw bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a `u16`-length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the string is longer than the
    /// `u16` length prefix can express.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        let Ok(length) = u16::try_from(text.len()) else {
            return Err(malformed_error!(
                "String of {} bytes exceeds the u16 length prefix",
                text.len()
            ));
        };

        self.write_u16(length);
        self.buffer.extend_from_slice(text.as_bytes());
        Ok(())
    }

    /// Consume the writer and return the emitted bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

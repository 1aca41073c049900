//! Sequential encoding for generated packet codecs.
//!
//! This module provides [`WireWriter`], which appends fields in declaration
//! order and enforces the limits the wire format imposes: Fixed fields must
//! match their declared length, Variable fields must fit their length prefix
//! and Variable blocks carry at most 255 instances.

use crate::buffer::WriteBuffer;
use crate::error::{Error, Result};
use crate::header::{Frequency, encode_command};
use crate::types::WireValue;

/// Maximum instance count of a Variable block.
pub const MAX_BLOCK_COUNT: usize = u8::MAX as usize;

/// Returns the maximum payload length for a Variable prefix width.
///
/// # Errors
/// Returns [`Error::InvalidVariableWidth`] unless `width` is 1 or 2.
pub const fn variable_max(width: usize) -> Result<usize> {
    match width {
        1 => Ok(u8::MAX as usize),
        2 => Ok(u16::MAX as usize),
        _ => Err(Error::InvalidVariableWidth { width }),
    }
}

/// Appends wire values to a growable buffer.
#[derive(Debug)]
pub struct WireWriter<'a, B: WriteBuffer + ?Sized = Vec<u8>> {
    buffer: &'a mut B,
    start: usize,
}

impl<'a, B: WriteBuffer + ?Sized> WireWriter<'a, B> {
    /// Creates a writer appending to `buffer`.
    pub fn new(buffer: &'a mut B) -> Self {
        let start = buffer.written();
        Self { buffer, start }
    }

    /// Returns the number of bytes written through this writer.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.buffer.written() - self.start
    }

    /// Appends a fixed-width value.
    #[inline]
    pub fn write<T: WireValue>(&mut self, value: &T) {
        value.encode(self.buffer);
    }

    /// Appends a big-endian u16 (IPPORT).
    #[inline]
    pub fn write_u16_be(&mut self, value: u16) {
        self.buffer.put_u16_be(value);
    }

    /// Appends a Fixed field of exactly `len` bytes.
    ///
    /// # Errors
    /// Returns [`Error::FixedLengthMismatch`] if `data` has another length.
    pub fn write_fixed(&mut self, data: &[u8], len: usize) -> Result<()> {
        if data.len() != len {
            return Err(Error::FixedLengthMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        self.buffer.put_bytes(data);
        Ok(())
    }

    /// Appends a length-prefixed Variable field.
    ///
    /// # Arguments
    /// * `data` - Field payload
    /// * `width` - Prefix width in bytes (1 or 2)
    ///
    /// # Errors
    /// Returns [`Error::VariableOverflow`] if `data` does not fit the prefix,
    /// or [`Error::InvalidVariableWidth`] for a width other than 1 or 2.
    pub fn write_variable(&mut self, data: &[u8], width: usize) -> Result<()> {
        let max = variable_max(width)?;
        if data.len() > max {
            return Err(Error::VariableOverflow {
                len: data.len(),
                max,
                width,
            });
        }
        if width == 1 {
            self.buffer.put_u8(data.len() as u8);
        } else {
            self.buffer.put_u16_le(data.len() as u16);
        }
        self.buffer.put_bytes(data);
        Ok(())
    }

    /// Appends the instance count of a Variable block.
    ///
    /// # Errors
    /// Returns [`Error::ArityMismatch`] if `count` exceeds 255.
    pub fn write_count(&mut self, block: &'static str, count: usize) -> Result<()> {
        if count > MAX_BLOCK_COUNT {
            return Err(Error::ArityMismatch {
                block,
                expected: MAX_BLOCK_COUNT,
                actual: count,
            });
        }
        self.buffer.put_u8(count as u8);
        Ok(())
    }

    /// Checks that a Multiple block holds exactly `expected` instances.
    ///
    /// # Errors
    /// Returns [`Error::ArityMismatch`] on any other count.
    pub fn expect_count(&self, block: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(Error::ArityMismatch {
                block,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Appends the command framing for a packet.
    pub fn write_command(&mut self, frequency: Frequency, id: u16) {
        encode_command(self.buffer, frequency, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_basic() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);

        writer.write(&0xFFu8);
        writer.write(&0x1234u16);
        writer.write_u16_be(0x1234);
        assert_eq!(writer.bytes_written(), 5);
        assert_eq!(buf, vec![0xFF, 0x34, 0x12, 0x12, 0x34]);
    }

    #[test]
    fn test_writer_appends_after_existing_bytes() {
        let mut buf = vec![0xAA, 0xBB];
        let mut writer = WireWriter::new(&mut buf);
        writer.write(&1u32);
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_write_variable_prefixes() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        writer.write_variable(b"hi", 1).unwrap();
        writer.write_variable(b"hey", 2).unwrap();
        assert_eq!(buf, vec![2, b'h', b'i', 3, 0, b'h', b'e', b'y']);
    }

    #[test]
    fn test_write_variable_overflow() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        let payload = vec![0u8; 256];
        assert_eq!(
            writer.write_variable(&payload, 1),
            Err(Error::VariableOverflow {
                len: 256,
                max: 255,
                width: 1
            })
        );
        assert!(writer.write_variable(&payload, 2).is_ok());
        assert!(writer.write_variable(&vec![0u8; 65_536], 2).is_err());
    }

    #[test]
    fn test_write_variable_invalid_width() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        assert_eq!(
            writer.write_variable(b"x", 4),
            Err(Error::InvalidVariableWidth { width: 4 })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_write_fixed_length_checked() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        assert!(writer.write_fixed(&[1, 2, 3, 4], 4).is_ok());
        assert_eq!(
            writer.write_fixed(&[1, 2], 4),
            Err(Error::FixedLengthMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_write_count_limits() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        assert!(writer.write_count("Data", 255).is_ok());
        assert!(writer.write_count("Data", 256).is_err());
        assert!(writer.expect_count("Data", 4, 4).is_ok());
        assert!(writer.expect_count("Data", 4, 3).is_err());
    }
}

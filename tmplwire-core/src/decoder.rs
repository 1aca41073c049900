//! Cursor-style decoding for generated packet codecs.
//!
//! This module provides [`WireReader`], which walks a payload front to back
//! the same way the layout calculator does: fixed-width values advance by
//! their width, Variable fields by their prefix plus payload, and Variable
//! blocks by a one-byte instance count.

use crate::buffer::ReadBuffer;
use crate::error::{Error, Result};
use crate::header::{Frequency, decode_command};
use crate::types::WireValue;

/// Reads wire values sequentially from a byte slice.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader positioned at the start of the buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Creates a reader positioned at `offset`.
    #[must_use]
    pub const fn at(buffer: &'a [u8], offset: usize) -> Self {
        Self {
            buffer,
            position: offset,
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the unread tail of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.buffer.get(self.position..).unwrap_or_default()
    }

    /// Reads a fixed-width value and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the value is truncated.
    #[inline]
    pub fn read<T: WireValue>(&mut self) -> Result<T> {
        let value = T::decode(self.buffer, self.position)?;
        self.position += T::WIDTH;
        Ok(value)
    }

    /// Reads a big-endian u16 (IPPORT) and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the value is truncated.
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let value = self.buffer.get_u16_be(self.position)?;
        self.position += 2;
        Ok(value)
    }

    /// Reads exactly `len` raw bytes (Fixed field) and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if fewer than `len` bytes remain.
    pub fn read_fixed(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.buffer.get_bytes(self.position, len)?.to_vec();
        self.position += len;
        Ok(bytes)
    }

    /// Reads a length-prefixed Variable field and advances.
    ///
    /// # Arguments
    /// * `width` - Prefix width in bytes (1 or 2)
    ///
    /// # Errors
    /// Returns [`Error::InvalidVariableWidth`] for any other width and
    /// [`Error::BufferTooShort`] if the payload is truncated.
    pub fn read_variable(&mut self, width: usize) -> Result<Vec<u8>> {
        let len = match width {
            1 => usize::from(self.buffer.get_u8(self.position)?),
            2 => usize::from(self.buffer.get_u16_le(self.position)?),
            _ => return Err(Error::InvalidVariableWidth { width }),
        };
        let bytes = self.buffer.get_bytes(self.position + width, len)?.to_vec();
        self.position += width + len;
        Ok(bytes)
    }

    /// Reads the one-byte instance count of a Variable block and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the buffer is exhausted.
    #[inline]
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.buffer.get_u8(self.position)?;
        self.position += 1;
        Ok(usize::from(count))
    }

    /// Reads the command framing and advances past it.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the framing is truncated.
    pub fn read_command(&mut self) -> Result<(Frequency, u16)> {
        let (frequency, id) = decode_command(self.buffer, self.position)?;
        self.position += frequency.command_width();
        Ok((frequency, id))
    }
}

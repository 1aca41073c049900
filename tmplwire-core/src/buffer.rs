//! Buffer traits for bounds-checked wire access.
//!
//! This module provides:
//! - [`ReadBuffer`] trait for bounds-checked reads at absolute offsets
//! - [`WriteBuffer`] trait for append-only writes
//!
//! Unless a method name says otherwise, multi-byte values are little-endian.
//! The only big-endian accessors exist for IPPORT fields and the Low
//! frequency command id.

use crate::error::{Error, Result};

/// Trait for read-only buffer access with bounds-checked primitive reads.
///
/// Raw datagrams come from the network, so every read validates that the
/// requested range lies inside the buffer and reports
/// [`Error::BufferTooShort`] otherwise.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a slice of bytes at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to read
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the range is out of bounds.
    #[inline]
    fn get_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let slice = self.as_slice();
        let end = offset
            .checked_add(len)
            .ok_or(Error::short(usize::MAX, slice.len()))?;
        slice
            .get(offset..end)
            .ok_or(Error::short(end, slice.len()))
    }

    /// Reads `N` bytes at the given offset into an array.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if the range is out of bounds.
    #[inline]
    fn get_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(offset, N)?);
        Ok(out)
    }

    /// Reads a u8 at the given offset.
    #[inline]
    fn get_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.get_array::<1>(offset)?[0])
    }

    /// Reads an i8 at the given offset.
    #[inline]
    fn get_i8(&self, offset: usize) -> Result<i8> {
        Ok(i8::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads a u16 in little-endian at the given offset.
    #[inline]
    fn get_u16_le(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads a u16 in big-endian at the given offset.
    #[inline]
    fn get_u16_be(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_be_bytes(self.get_array(offset)?))
    }

    /// Reads an i16 in little-endian at the given offset.
    #[inline]
    fn get_i16_le(&self, offset: usize) -> Result<i16> {
        Ok(i16::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads a u32 in little-endian at the given offset.
    #[inline]
    fn get_u32_le(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads an i32 in little-endian at the given offset.
    #[inline]
    fn get_i32_le(&self, offset: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads a u64 in little-endian at the given offset.
    #[inline]
    fn get_u64_le(&self, offset: usize) -> Result<u64> {
        Ok(u64::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads an i64 in little-endian at the given offset.
    #[inline]
    fn get_i64_le(&self, offset: usize) -> Result<i64> {
        Ok(i64::from_le_bytes(self.get_array(offset)?))
    }

    /// Reads an f32 in little-endian at the given offset.
    #[inline]
    fn get_f32_le(&self, offset: usize) -> Result<f32> {
        Ok(f32::from_bits(self.get_u32_le(offset)?))
    }

    /// Reads an f64 in little-endian at the given offset.
    #[inline]
    fn get_f64_le(&self, offset: usize) -> Result<f64> {
        Ok(f64::from_bits(self.get_u64_le(offset)?))
    }
}

/// Trait for append-only buffer writes.
///
/// Generated encoders never seek backwards: every field is appended in
/// declaration order, so a growable sink is all they need.
pub trait WriteBuffer {
    /// Appends raw bytes.
    fn put_bytes(&mut self, src: &[u8]);

    /// Returns the number of bytes written so far.
    fn written(&self) -> usize;

    /// Appends a u8.
    #[inline]
    fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    /// Appends an i8.
    #[inline]
    fn put_i8(&mut self, value: i8) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a u16 in little-endian.
    #[inline]
    fn put_u16_le(&mut self, value: u16) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a u16 in big-endian.
    #[inline]
    fn put_u16_be(&mut self, value: u16) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Appends an i16 in little-endian.
    #[inline]
    fn put_i16_le(&mut self, value: i16) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a u32 in little-endian.
    #[inline]
    fn put_u32_le(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends an i32 in little-endian.
    #[inline]
    fn put_i32_le(&mut self, value: i32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a u64 in little-endian.
    #[inline]
    fn put_u64_le(&mut self, value: u64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends an i64 in little-endian.
    #[inline]
    fn put_i64_le(&mut self, value: i64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends an f32 in little-endian.
    #[inline]
    fn put_f32_le(&mut self, value: f32) {
        self.put_u32_le(value.to_bits());
    }

    /// Appends an f64 in little-endian.
    #[inline]
    fn put_f64_le(&mut self, value: f64) {
        self.put_u64_le(value.to_bits());
    }
}

impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> ReadBuffer for [u8; N] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl WriteBuffer for Vec<u8> {
    #[inline(always)]
    fn put_bytes(&mut self, src: &[u8]) {
        self.extend_from_slice(src);
    }

    #[inline(always)]
    fn written(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_primitives() {
        let mut buf = Vec::new();
        buf.put_u8(0x42);
        buf.put_i8(-1);
        buf.put_u16_le(0x1234);
        buf.put_u16_be(0x1234);
        buf.put_u32_le(0xDEADBEEF);
        buf.put_i64_le(-7);
        buf.put_f32_le(1.5);
        buf.put_f64_le(-2.25);

        assert_eq!(buf.get_u8(0).unwrap(), 0x42);
        assert_eq!(buf.get_i8(1).unwrap(), -1);
        assert_eq!(buf.get_u16_le(2).unwrap(), 0x1234);
        assert_eq!(&buf[4..6], &[0x12, 0x34]);
        assert_eq!(buf.get_u16_be(4).unwrap(), 0x1234);
        assert_eq!(buf.get_u32_le(6).unwrap(), 0xDEADBEEF);
        assert_eq!(buf.get_i64_le(10).unwrap(), -7);
        assert_eq!(buf.get_f32_le(18).unwrap(), 1.5);
        assert_eq!(buf.get_f64_le(22).unwrap(), -2.25);
        assert_eq!(buf.written(), 30);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = Vec::new();
        buf.put_u32_le(0x01020304);
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_out_of_bounds_read() {
        let buf = [1u8, 2, 3];
        assert_eq!(buf.get_u32_le(0), Err(Error::short(4, 3)));
        assert_eq!(buf.get_u8(3), Err(Error::short(4, 3)));
        assert!(buf.get_bytes(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_slice_read_buffer() {
        let data: &[u8] = &[0xAA, 0xBB, 0xCC];
        assert_eq!(data.len(), 3);
        assert!(!data.is_empty());
        assert_eq!(data.get_bytes(1, 2).unwrap(), &[0xBB, 0xCC]);
        assert_eq!(data.get_bytes(3, 0).unwrap(), &[] as &[u8]);
    }
}

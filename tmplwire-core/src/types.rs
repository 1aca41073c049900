//! Fixed-width wire values.
//!
//! This module provides the [`WireValue`] trait that generated codecs use for
//! every statically sized field type, along with the structured values the
//! template language names (UUID, vectors and quaternion).

use std::fmt;

use crate::buffer::{ReadBuffer, WriteBuffer};
use crate::error::Result;

/// A value with a fixed encoded width.
pub trait WireValue: Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Appends the encoded value to the buffer.
    fn encode<B: WriteBuffer + ?Sized>(&self, out: &mut B);

    /// Decodes a value at the given offset.
    ///
    /// # Errors
    /// Returns an error if the buffer is too short.
    fn decode<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<Self>;
}

macro_rules! impl_wire_scalar {
    ($ty:ty, $width:expr, $get:ident, $put:ident) => {
        impl WireValue for $ty {
            const WIDTH: usize = $width;

            #[inline]
            fn encode<B: WriteBuffer + ?Sized>(&self, out: &mut B) {
                out.$put(*self);
            }

            #[inline]
            fn decode<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<Self> {
                buf.$get(offset)
            }
        }
    };
}

impl_wire_scalar!(u8, 1, get_u8, put_u8);
impl_wire_scalar!(i8, 1, get_i8, put_i8);
impl_wire_scalar!(u16, 2, get_u16_le, put_u16_le);
impl_wire_scalar!(i16, 2, get_i16_le, put_i16_le);
impl_wire_scalar!(u32, 4, get_u32_le, put_u32_le);
impl_wire_scalar!(i32, 4, get_i32_le, put_i32_le);
impl_wire_scalar!(u64, 8, get_u64_le, put_u64_le);
impl_wire_scalar!(i64, 8, get_i64_le, put_i64_le);
impl_wire_scalar!(f32, 4, get_f32_le, put_f32_le);
impl_wire_scalar!(f64, 8, get_f64_le, put_f64_le);

impl WireValue for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn encode<B: WriteBuffer + ?Sized>(&self, out: &mut B) {
        out.put_u8(u8::from(*self));
    }

    #[inline]
    fn decode<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<Self> {
        Ok(buf.get_u8(offset)? != 0)
    }
}

/// 128-bit identifier, carried as 16 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Uuid(pub [u8; 16]);

impl Uuid {
    /// The all-zero identifier.
    pub const NIL: Self = Self([0; 16]);

    /// Creates an identifier from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns true for the all-zero identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0; 16]
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl WireValue for Uuid {
    const WIDTH: usize = 16;

    #[inline]
    fn encode<B: WriteBuffer + ?Sized>(&self, out: &mut B) {
        out.put_bytes(&self.0);
    }

    #[inline]
    fn decode<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<Self> {
        Ok(Self(buf.get_array(offset)?))
    }
}

/// Single-precision 3D vector (12 bytes, x/y/z).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

/// Double-precision 3D vector (24 bytes, x/y/z).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3d {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

/// Single-precision 4D vector (16 bytes, x/y/z/w).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

/// Rotation quaternion (16 bytes, x/y/z/w).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

macro_rules! impl_wire_vector {
    ($ty:ident, $elem:ty, $width:expr, [$($field:ident),+]) => {
        impl WireValue for $ty {
            const WIDTH: usize = $width;

            #[inline]
            fn encode<B: WriteBuffer + ?Sized>(&self, out: &mut B) {
                $( self.$field.encode(out); )+
            }

            #[inline]
            fn decode<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<Self> {
                let mut cursor = offset;
                $(
                    let $field = <$elem>::decode(buf, cursor)?;
                    cursor += <$elem as WireValue>::WIDTH;
                )+
                let _ = cursor;
                Ok(Self { $($field),+ })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$field.to_string()),+];
                write!(f, "<{}>", parts.join(", "))
            }
        }
    };
}

impl_wire_vector!(Vector3, f32, 12, [x, y, z]);
impl_wire_vector!(Vector3d, f64, 24, [x, y, z]);
impl_wire_vector!(Vector4, f32, 16, [x, y, z, w]);
impl_wire_vector!(Quaternion, f32, 16, [x, y, z, w]);

/// Display adapter for Fixed and Variable byte fields.
///
/// Printable UTF-8 (ignoring one trailing NUL) is shown as text, anything
/// else as lowercase hex.
#[derive(Debug, Clone, Copy)]
pub struct BytesDisplay<'a>(pub &'a [u8]);

impl fmt::Display for BytesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.0.strip_suffix(&[0]).unwrap_or(self.0);
        if let Ok(text) = std::str::from_utf8(trimmed)
            && !text.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
        {
            return f.write_str(text);
        }
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

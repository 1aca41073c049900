//! Command-id framing.
//!
//! Every packet payload starts with a command id whose width depends on the
//! packet's frequency class:
//!
//! ```text
//! High:         [id]                  (1 byte)
//! Medium: 0xFF  [id]                  (2 bytes)
//! Low:    0xFF  0xFF  [id_hi] [id_lo] (4 bytes, id = byte0 * 256 + byte1)
//! ```
//!
//! Fixed packets share the Low framing: their narrowed ids live in the Low
//! numeric space.

use std::fmt;

use crate::buffer::{ReadBuffer, WriteBuffer};
use crate::error::Result;

/// Marker byte that escapes into a wider command id.
pub const FREQUENCY_MARKER: u8 = 0xFF;

/// Packet frequency class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    /// 1-byte command id.
    High,
    /// Marker byte plus 1-byte command id.
    Medium,
    /// Two marker bytes plus 2-byte command id.
    Low,
    /// Explicitly numbered packet, framed like Low.
    Fixed,
}

impl Frequency {
    /// All frequency classes in template order.
    pub const ALL: [Self; 4] = [Self::High, Self::Medium, Self::Low, Self::Fixed];

    /// Parses a frequency keyword from a template header.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            "Fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    /// Returns the template keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Fixed => "Fixed",
        }
    }

    /// Returns the number of bytes the command id occupies on the wire.
    #[must_use]
    pub const fn command_width(&self) -> usize {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low | Self::Fixed => 4,
        }
    }

    /// Returns the frequency whose framing this class uses on the wire.
    #[must_use]
    pub const fn wire_class(&self) -> Self {
        match self {
            Self::Fixed => Self::Low,
            other => *other,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes the command framing at `offset`.
///
/// Returns the wire frequency class (never [`Frequency::Fixed`]) and the id.
///
/// # Errors
/// Returns [`crate::Error::BufferTooShort`] if the framing is truncated.
pub fn decode_command<B: ReadBuffer + ?Sized>(buf: &B, offset: usize) -> Result<(Frequency, u16)> {
    let first = buf.get_u8(offset)?;
    if first != FREQUENCY_MARKER {
        return Ok((Frequency::High, u16::from(first)));
    }
    let second = buf.get_u8(offset + 1)?;
    if second != FREQUENCY_MARKER {
        return Ok((Frequency::Medium, u16::from(second)));
    }
    Ok((Frequency::Low, buf.get_u16_be(offset + 2)?))
}

/// Appends the command framing for a packet.
///
/// High and Medium ids are truncated to their low byte.
pub fn encode_command<B: WriteBuffer + ?Sized>(out: &mut B, frequency: Frequency, id: u16) {
    match frequency {
        Frequency::High => out.put_u8(id as u8),
        Frequency::Medium => {
            out.put_u8(FREQUENCY_MARKER);
            out.put_u8(id as u8);
        }
        Frequency::Low | Frequency::Fixed => {
            out.put_u8(FREQUENCY_MARKER);
            out.put_u8(FREQUENCY_MARKER);
            out.put_u16_be(id);
        }
    }
}

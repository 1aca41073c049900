//! Packet trait implemented by generated codecs.
//!
//! This module provides the [`TemplatePacket`] trait. The code generator
//! emits one implementation per template packet; the provided methods add
//! the command framing around the generated block codecs.

use crate::decoder::WireReader;
use crate::encoder::WireWriter;
use crate::error::{Error, Result};
use crate::header::Frequency;

/// Trait for typed template packets.
///
/// # Example
/// ```ignore
/// // Generated packet usage
/// let packet = UseCircuitCodePacket { circuit_code: block, ..Default::default() };
/// let payload = packet.to_payload()?;
/// let decoded = UseCircuitCodePacket::from_payload(&payload)?;
/// ```
pub trait TemplatePacket: Sized {
    /// Packet name as declared in the template.
    const NAME: &'static str;

    /// Command id within the frequency class.
    const ID: u16;

    /// Frequency class.
    const FREQUENCY: Frequency;

    /// Whether the packet is only accepted from trusted peers.
    const TRUSTED: bool;

    /// Whether the packet body is zerocoded by the transport.
    const ZEROCODED: bool;

    /// Whether the template marks the packet deprecated.
    const DEPRECATED: bool;

    /// Appends every block of the packet body.
    ///
    /// # Errors
    /// Returns an error if a field or block violates its declared shape.
    fn encode_body(&self, writer: &mut WireWriter<'_>) -> Result<()>;

    /// Decodes every block of the packet body.
    ///
    /// # Errors
    /// Returns an error if the body is truncated or malformed.
    fn decode_body(reader: &mut WireReader<'_>) -> Result<Self>;

    /// Encodes the command framing followed by the body.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded.
    fn to_payload(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        let mut writer = WireWriter::new(&mut payload);
        writer.write_command(Self::FREQUENCY, Self::ID);
        self.encode_body(&mut writer)?;
        Ok(payload)
    }

    /// Decodes a payload that starts with this packet's command framing.
    ///
    /// # Errors
    /// Returns [`Error::CommandMismatch`] if the framing names another packet,
    /// or any decoding error from the body.
    fn from_payload(payload: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(payload);
        let (frequency, id) = reader.read_command()?;
        let expected = Self::FREQUENCY.wire_class();
        if frequency != expected || id != Self::ID {
            return Err(Error::CommandMismatch {
                expected_frequency: expected.as_str(),
                expected: Self::ID,
                actual_frequency: frequency.as_str(),
                actual: id,
            });
        }
        Self::decode_body(&mut reader)
    }
}

//! # tmplwire Core
//!
//! Core types and traits for the message-template wire format.
//!
//! This crate provides:
//! - Buffer traits for bounds-checked primitive reads and writes
//! - Cursor-style [`WireReader`] / [`WireWriter`] used by generated codecs
//! - Fixed-width structured values (UUID, vectors, quaternion)
//! - Command-id framing for the Low/Medium/High frequency classes
//! - The [`TemplatePacket`] trait implemented by generated packets
//! - Error types for encoding/decoding operations

pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod packet;
pub mod types;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use decoder::WireReader;
pub use encoder::WireWriter;
pub use error::{Error, Result};
pub use header::{Frequency, decode_command, encode_command};
pub use packet::TemplatePacket;
pub use types::{BytesDisplay, Quaternion, Uuid, Vector3, Vector3d, Vector4, WireValue};

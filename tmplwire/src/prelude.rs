//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use tmplwire::prelude::*;
//! ```

// Core types
pub use tmplwire_core::buffer::{ReadBuffer, WriteBuffer};
pub use tmplwire_core::error::{Error as CoreError, Result as CoreResult};
pub use tmplwire_core::header::{Frequency, decode_command, encode_command};
pub use tmplwire_core::types::{Quaternion, Uuid, Vector3, Vector3d, Vector4};
pub use tmplwire_core::{TemplatePacket, WireReader, WireWriter};

// Schema types
pub use tmplwire_schema::{
    Block, BlockArity, Field, FieldType, KeywordIndex, Packet, ParseError, ParseOptions,
    SchemaError, Template, block_repeat_count, block_size, field_offset, field_size, packet_size,
    validate_template,
};

// Code generation
pub use tmplwire_codegen::{CodegenError, Generator, GeneratorConfig};

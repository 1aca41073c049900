//! # tmplwire Schema
//!
//! Message template parser and schema model.
//!
//! This crate provides:
//! - Template parsing into an immutable, keyword-interned schema
//! - Per-frequency packet maps with name and id lookups
//! - Offset and size calculation directly on raw message bodies
//! - Template validation
//! - Template file obfuscation
//! - Intermediate representation for code generation

pub mod error;
pub mod ir;
pub mod keywords;
pub mod layout;
pub mod messages;
pub mod obfuscation;
pub mod parser;
pub mod template;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::TemplateIr;
pub use keywords::{KeywordIndex, KeywordTable};
pub use layout::{block_repeat_count, block_size, field_offset, field_size, packet_size};
pub use messages::{Block, Field, Packet};
pub use obfuscation::obfuscate;
pub use parser::{ParseOptions, parse_template};
pub use template::{DEFAULT_PAYLOAD_OFFSET, PacketMap, Template};
pub use types::{BlockArity, FieldType};
pub use validation::validate_template;

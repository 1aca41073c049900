//! # tmplwire
//!
//! Message-template protocol schema engine.
//!
//! tmplwire reads the brace-delimited message template language of a legacy
//! UDP protocol and gives three consistent views of the same wire format:
//!
//! - **Schema** - an immutable, keyword-interned model of every packet,
//!   block and field, with lookups by name and by command id
//! - **Offset calculator** - field offsets, block repeat counts and sizes
//!   computed directly on raw message bodies
//! - **Code generator** - typed Rust structs with encode/decode/`Display`
//!   per packet, plus a command-id dispatch table
//!
//! ## Quick Start
//!
//! ```ignore
//! use tmplwire::prelude::*;
//!
//! let template = Template::from_file("message_template.msg", ParseOptions::default())?;
//! let packet = template.packet_from_buffer(&datagram)?;
//! let body = template.body(packet, &datagram)?;
//! let block = template.keyword("AgentData").unwrap();
//! let field = template.keyword("AgentID").unwrap();
//! let located = field_offset(packet, body, block, field, 0)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Buffer traits, wire values, command framing, packet trait
//! - [`schema`] - Template parsing, schema model, offset calculator
//! - [`codegen`] - Rust code generation from templates

pub mod prelude;

/// Core types and traits for wire encoding/decoding.
pub mod core {
    pub use tmplwire_core::*;
}

/// Template parsing, schema model and offset calculation.
pub mod schema {
    pub use tmplwire_schema::*;
}

/// Code generation from message templates.
pub mod codegen {
    pub use tmplwire_codegen::*;
}

// Re-export commonly used items at the crate root
pub use tmplwire_core::{Frequency, ReadBuffer, TemplatePacket, WireReader, WireWriter, WriteBuffer};
pub use tmplwire_schema::{ParseOptions, Template};

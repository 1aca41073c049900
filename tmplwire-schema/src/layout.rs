//! Offset and size calculation on raw message bodies.
//!
//! These functions answer layout questions directly against an untyped
//! buffer, without decoding a packet. The `body` argument always starts at
//! the first byte of the first block; use [`crate::Template::body`] to slice
//! it out of a raw datagram.
//!
//! The walk mirrors the wire contract followed by generated codecs: blocks in
//! packet order, a one-byte repeat count in front of each Variable block, and
//! a one- or two-byte little-endian length in front of each Variable field.

use tmplwire_core::ReadBuffer;

use crate::error::SchemaError;
use crate::keywords::KeywordIndex;
use crate::messages::{Block, Field, Packet};
use crate::types::{BlockArity, FieldType};

/// Returns the encoded width of `field` at `offset`.
///
/// Fixed fields take their declared count and never read the buffer.
/// Variable fields read their length prefix, so they need a buffer.
///
/// # Errors
/// Returns [`SchemaError::BufferRequired`] for a Variable field without a
/// buffer, [`SchemaError::InvalidVariableWidth`] for a prefix width other
/// than 1 or 2, and [`SchemaError::Core`] if the prefix lies past the end of
/// the buffer.
pub fn field_size(field: &Field, buffer: Option<&[u8]>, offset: usize) -> Result<usize, SchemaError> {
    match field.field_type {
        FieldType::Fixed => Ok(field.count),
        FieldType::Variable => {
            let buffer = buffer.ok_or(SchemaError::BufferRequired)?;
            match field.count {
                1 => Ok(usize::from(buffer.get_u8(offset)?) + 1),
                2 => Ok(usize::from(buffer.get_u16_le(offset)?) + 2),
                width => Err(SchemaError::InvalidVariableWidth { width }),
            }
        }
        other => Ok(other.width()),
    }
}

/// Returns the width of one block instance made of `fields` at `offset`.
///
/// # Errors
/// Propagates [`field_size`] errors.
pub fn block_size(fields: &[Field], buffer: Option<&[u8]>, offset: usize) -> Result<usize, SchemaError> {
    let mut size = 0;
    for field in fields {
        size += field_size(field, buffer, offset + size)?;
    }
    Ok(size)
}

/// Returns the live instance count of `block` in `body`.
///
/// # Errors
/// Returns [`SchemaError::BlockNotFound`] if the packet has no such block,
/// or a buffer error if the walk runs off the end of `body`.
pub fn block_repeat_count(
    packet: &Packet,
    body: &[u8],
    block: KeywordIndex,
) -> Result<usize, SchemaError> {
    find_block(packet, block)?;

    let mut cursor = 0;
    for candidate in &packet.blocks {
        let count = live_count(candidate, body, &mut cursor)?;
        if candidate.keyword == block {
            return Ok(count);
        }
        cursor = skip_instances(candidate, body, cursor, count)?;
    }
    Err(block_not_found(packet, block))
}

/// Locates a field inside a given instance of a block.
///
/// Instances before `instance` are skipped, clamped to the live count. The
/// returned field is a copy of the definition whose `offset` is the absolute
/// position in `body`.
///
/// # Errors
/// Returns [`SchemaError::BlockNotFound`] or [`SchemaError::FieldNotFound`]
/// for unknown keywords, or a buffer error if the walk runs off the end of
/// `body`.
pub fn field_offset(
    packet: &Packet,
    body: &[u8],
    block: KeywordIndex,
    field: KeywordIndex,
    instance: usize,
) -> Result<Field, SchemaError> {
    let target = find_block(packet, block)?;
    if target.field(field).is_none() {
        return Err(field_not_found(packet, block, field));
    }

    let mut cursor = 0;
    for candidate in &packet.blocks {
        let count = live_count(candidate, body, &mut cursor)?;
        if candidate.keyword != block {
            cursor = skip_instances(candidate, body, cursor, count)?;
            continue;
        }

        cursor = skip_instances(candidate, body, cursor, count.min(instance))?;
        for definition in &candidate.fields {
            if definition.keyword == field {
                let mut located = definition.clone();
                located.offset = Some(cursor);
                return Ok(located);
            }
            cursor += field_size(definition, Some(body), cursor)?;
        }
    }
    Err(field_not_found(packet, block, field))
}

/// Returns the total encoded width of the packet body.
///
/// # Errors
/// Returns a buffer error if the walk runs off the end of `body`.
pub fn packet_size(packet: &Packet, body: &[u8]) -> Result<usize, SchemaError> {
    let mut cursor = 0;
    for block in &packet.blocks {
        let count = live_count(block, body, &mut cursor)?;
        cursor = skip_instances(block, body, cursor, count)?;
    }
    Ok(cursor)
}

fn find_block(packet: &Packet, block: KeywordIndex) -> Result<&Block, SchemaError> {
    packet
        .block(block)
        .ok_or_else(|| block_not_found(packet, block))
}

fn block_not_found(packet: &Packet, block: KeywordIndex) -> SchemaError {
    SchemaError::BlockNotFound {
        packet: packet.name.clone(),
        block: block.get(),
    }
}

fn field_not_found(packet: &Packet, block: KeywordIndex, field: KeywordIndex) -> SchemaError {
    SchemaError::FieldNotFound {
        packet: packet.name.clone(),
        block: block.get(),
        field: field.get(),
    }
}

/// Reads the instance count, consuming the count byte of a Variable block.
fn live_count(block: &Block, body: &[u8], cursor: &mut usize) -> Result<usize, SchemaError> {
    match block.arity {
        BlockArity::Single => Ok(1),
        BlockArity::Multiple(n) => Ok(n),
        BlockArity::Variable => {
            let count = body.get_u8(*cursor)?;
            *cursor += 1;
            Ok(usize::from(count))
        }
    }
}

fn skip_instances(
    block: &Block,
    body: &[u8],
    mut cursor: usize,
    count: usize,
) -> Result<usize, SchemaError> {
    if let Some(size) = block.size {
        return Ok(cursor + size * count);
    }
    for _ in 0..count {
        cursor += block_size(&block.fields, Some(body), cursor)?;
    }
    Ok(cursor)
}

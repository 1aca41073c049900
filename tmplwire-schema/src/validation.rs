//! Template validation utilities.
//!
//! Parsing accepts anything the legacy loader accepted. These checks catch
//! the definitions that parse but cannot be encoded, or that make lookups
//! ambiguous, before code is generated from them.

use std::collections::HashSet;

use tmplwire_core::Frequency;

use crate::error::SchemaError;
use crate::ir::to_pascal_case;
use crate::messages::{Block, Packet};
use crate::template::Template;
use crate::types::{BlockArity, FieldType};

/// Validates a parsed template for consistency.
///
/// # Arguments
/// * `template` - The template to validate
///
/// # Errors
/// Returns [`SchemaError::Validation`] describing the first problem found,
/// or [`SchemaError::InvalidVariableWidth`] for a Variable field whose
/// prefix width is not 1 or 2.
pub fn validate_template(template: &Template) -> Result<(), SchemaError> {
    validate_names(template)?;
    validate_identifiers(template)?;
    validate_ids(template)?;
    for packet in template.packets() {
        validate_packet(template, packet)?;
    }
    Ok(())
}

/// Packet names are unique across all classes.
fn validate_names(template: &Template) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for packet in template.packets() {
        if !seen.insert(packet.name.as_str()) {
            return Err(SchemaError::validation(format!(
                "Duplicate packet name '{}'",
                packet.name
            )));
        }
    }
    Ok(())
}

/// Generated type names are unique and leave `PacketType::Default` free.
fn validate_identifiers(template: &Template) -> Result<(), SchemaError> {
    let mut variants = HashSet::new();
    let mut blocks = HashSet::new();
    for packet in template.packets() {
        let variant = to_pascal_case(&packet.name);
        if variant == "Default" {
            return Err(SchemaError::validation(format!(
                "Packet name '{}' is reserved for the unknown packet type",
                packet.name
            )));
        }
        if !variants.insert(variant.clone()) {
            return Err(SchemaError::validation(format!(
                "Packet '{}' generates the duplicate type name '{variant}'",
                packet.name
            )));
        }
        for block in &packet.blocks {
            let name = template.keyword_name(block.keyword)?;
            let struct_name = format!("{variant}{}Block", to_pascal_case(name));
            if !blocks.insert(struct_name.clone()) {
                return Err(SchemaError::validation(format!(
                    "Block '{name}' in packet '{}' generates the duplicate type name '{struct_name}'",
                    packet.name
                )));
            }
        }
    }
    Ok(())
}

/// Ids are unique per wire class; Fixed packets share the Low id space.
fn validate_ids(template: &Template) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for packet in template.packets() {
        let class = packet.frequency.wire_class();
        if !seen.insert((class, packet.id)) {
            return Err(SchemaError::validation(format!(
                "Duplicate {} id {} on packet '{}'",
                class, packet.id, packet.name
            )));
        }
    }
    Ok(())
}

fn validate_packet(template: &Template, packet: &Packet) -> Result<(), SchemaError> {
    // 0xFF in the id byte would read as the next class's marker.
    let one_byte = matches!(packet.frequency, Frequency::High | Frequency::Medium);
    if one_byte && packet.id >= u16::from(tmplwire_core::header::FREQUENCY_MARKER) {
        return Err(SchemaError::validation(format!(
            "{} packet '{}' id {} does not fit the command byte",
            packet.frequency, packet.name, packet.id
        )));
    }

    let mut seen = HashSet::new();
    for block in &packet.blocks {
        if !seen.insert(block.keyword) {
            return Err(SchemaError::validation(format!(
                "Duplicate block '{}' in packet '{}'",
                template.keyword_name(block.keyword)?,
                packet.name
            )));
        }
        validate_block(template, packet, block)?;
    }
    Ok(())
}

fn validate_block(template: &Template, packet: &Packet, block: &Block) -> Result<(), SchemaError> {
    if block.arity == BlockArity::Multiple(0) {
        return Err(SchemaError::validation(format!(
            "Block '{}' in packet '{}' repeats zero times",
            template.keyword_name(block.keyword)?,
            packet.name
        )));
    }

    let mut seen = HashSet::new();
    for field in &block.fields {
        if !seen.insert(field.keyword) {
            return Err(SchemaError::validation(format!(
                "Duplicate field '{}' in block '{}' of packet '{}'",
                template.keyword_name(field.keyword)?,
                template.keyword_name(block.keyword)?,
                packet.name
            )));
        }
        if field.field_type == FieldType::Variable && !matches!(field.count, 1 | 2) {
            return Err(SchemaError::InvalidVariableWidth { width: field.count });
        }
    }
    Ok(())
}

//! Packet, block and field definitions.
//!
//! Names are stored as [`KeywordIndex`] values; resolve them through the
//! owning [`crate::Template`].

use tmplwire_core::Frequency;

use crate::keywords::KeywordIndex;
use crate::types::{BlockArity, FieldType};

/// Field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Interned field name.
    pub keyword: KeywordIndex,
    /// Byte offset within the enclosing block, `None` once a preceding
    /// Variable field makes it data-dependent.
    pub offset: Option<usize>,
    /// Wire type.
    pub field_type: FieldType,
    /// Byte length for Fixed, prefix width for Variable, 1 otherwise unless
    /// the template gave an explicit count.
    pub count: usize,
    /// Whether the template line carried an explicit count token.
    pub counted: bool,
}

impl Field {
    /// Creates a field declared with the `{ name type }` shorthand.
    #[must_use]
    pub const fn new(keyword: KeywordIndex, field_type: FieldType) -> Self {
        Self {
            keyword,
            offset: None,
            field_type,
            count: 1,
            counted: false,
        }
    }

    /// Creates a field declared with an explicit count token.
    #[must_use]
    pub const fn with_count(keyword: KeywordIndex, field_type: FieldType, count: usize) -> Self {
        Self {
            keyword,
            offset: None,
            field_type,
            count,
            counted: true,
        }
    }

    /// Returns the encoded width when it does not depend on the data.
    #[must_use]
    pub const fn static_size(&self) -> Option<usize> {
        match self.field_type {
            FieldType::Fixed => Some(self.count),
            FieldType::Variable => None,
            other => Some(other.width()),
        }
    }
}

/// Block definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Interned block name.
    pub keyword: KeywordIndex,
    /// Width of one instance, `None` when it depends on the data.
    pub size: Option<usize>,
    /// Repeat arity.
    pub arity: BlockArity,
    /// Fields in wire order.
    pub fields: Vec<Field>,
}

impl Block {
    /// Creates an empty block.
    #[must_use]
    pub const fn new(keyword: KeywordIndex, arity: BlockArity) -> Self {
        Self {
            keyword,
            size: Some(0),
            arity,
            fields: Vec::new(),
        }
    }

    /// Adds a field at the end of the block.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Looks up a field by keyword.
    #[must_use]
    pub fn field(&self, keyword: KeywordIndex) -> Option<&Field> {
        self.fields.iter().find(|f| f.keyword == keyword)
    }

    /// Assigns static field offsets and the block size in current field
    /// order.
    ///
    /// A shorthand field advances the running offset by its width (the
    /// count for Fixed). A counted Variable field makes every later offset
    /// unknown, a counted Fixed field advances by its count, and any other
    /// counted field leaves the offset where it was.
    ///
    /// The size is the sum of the encoded field widths, independent of the
    /// offset rules, and is `None` if any field is Variable.
    pub fn lay_out(&mut self) {
        let mut offset = Some(0usize);
        for field in &mut self.fields {
            field.offset = offset;
            if !field.counted {
                let width = match field.field_type {
                    FieldType::Fixed => field.count,
                    other => other.width(),
                };
                offset = offset.map(|o| o + width);
                continue;
            }
            match field.field_type {
                FieldType::Variable => offset = None,
                FieldType::Fixed => offset = offset.map(|o| o + field.count),
                _ => {}
            }
        }
        self.size = self.fields.iter().map(Field::static_size).sum();
    }

    /// Orders fields by ascending keyword index.
    pub fn sort_fields(&mut self) {
        self.fields.sort_by_key(|f| f.keyword);
    }
}

/// Packet definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Command id within the frequency class.
    pub id: u16,
    /// Packet name.
    pub name: String,
    /// Frequency class.
    pub frequency: Frequency,
    /// Only accepted from trusted peers.
    pub trusted: bool,
    /// Body is zerocoded by the transport.
    pub zerocoded: bool,
    /// Marked deprecated in the template.
    pub deprecated: bool,
    /// Blocks in wire order.
    pub blocks: Vec<Block>,
}

impl Packet {
    /// Creates a packet with no blocks.
    #[must_use]
    pub fn new(name: impl Into<String>, frequency: Frequency, id: u16) -> Self {
        Self {
            id,
            name: name.into(),
            frequency,
            trusted: false,
            zerocoded: false,
            deprecated: false,
            blocks: Vec::new(),
        }
    }

    /// Adds a block at the end of the packet.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Looks up a block by keyword.
    #[must_use]
    pub fn block(&self, keyword: KeywordIndex) -> Option<&Block> {
        self.blocks.iter().find(|b| b.keyword == keyword)
    }

    /// Orders blocks by ascending keyword index.
    pub fn sort_blocks(&mut self) {
        self.blocks.sort_by_key(|b| b.keyword);
    }
}

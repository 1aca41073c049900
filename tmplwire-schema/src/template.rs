//! Parsed template and per-frequency packet maps.
//!
//! A [`Template`] is built once by the parser and is read-only afterwards,
//! so it can be shared between threads and queried without locking.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tmplwire_core::{Frequency, decode_command};

use crate::error::{ParseError, SchemaError};
use crate::keywords::{KeywordIndex, KeywordTable};
use crate::messages::Packet;
use crate::obfuscation::obfuscate;
use crate::parser::{ParseOptions, parse_template};

/// Default byte offset of the command id inside a raw datagram.
///
/// The transport header (flags, sequence number, extra-header length) owns
/// the bytes before it.
pub const DEFAULT_PAYLOAD_OFFSET: usize = 6;

/// Packets of one frequency class with name and id lookups.
#[derive(Debug, Clone)]
pub struct PacketMap {
    frequency: Frequency,
    packets: Vec<Packet>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u16, usize>,
}

impl PacketMap {
    /// Creates an empty map for a frequency class.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            packets: Vec::new(),
            by_name: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Adds a packet; a repeated name or id shadows the earlier entry in the
    /// lookups while both stay in declaration order.
    pub(crate) fn insert(&mut self, packet: Packet) {
        let index = self.packets.len();
        self.by_name.insert(packet.name.clone(), index);
        self.by_id.insert(packet.id, index);
        self.packets.push(packet);
    }

    /// Returns the frequency class.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Looks up a packet by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Packet> {
        self.by_name.get(name).map(|&idx| &self.packets[idx])
    }

    /// Looks up a packet by command id.
    #[must_use]
    pub fn get_by_id(&self, id: u16) -> Option<&Packet> {
        self.by_id.get(&id).map(|&idx| &self.packets[idx])
    }

    /// Iterates packets in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Packet> {
        self.packets.iter()
    }

    /// Returns the number of packets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Returns true if the class has no packets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

/// Parsed message template.
#[derive(Debug, Clone)]
pub struct Template {
    keywords: KeywordTable,
    high: PacketMap,
    medium: PacketMap,
    low: PacketMap,
    fixed: PacketMap,
    preamble: Vec<String>,
    sorted: bool,
    payload_offset: usize,
}

impl Template {
    pub(crate) fn from_parts(
        keywords: KeywordTable,
        packets: Vec<Packet>,
        preamble: Vec<String>,
        sorted: bool,
    ) -> Self {
        let mut template = Self {
            keywords,
            high: PacketMap::new(Frequency::High),
            medium: PacketMap::new(Frequency::Medium),
            low: PacketMap::new(Frequency::Low),
            fixed: PacketMap::new(Frequency::Fixed),
            preamble,
            sorted,
            payload_offset: DEFAULT_PAYLOAD_OFFSET,
        };
        for packet in packets {
            template.map_mut(packet.frequency).insert(packet);
        }
        template
    }

    /// Parses template text.
    ///
    /// # Errors
    /// Returns `ParseError` if the text is malformed.
    pub fn parse(text: &str, options: ParseOptions) -> Result<Self, ParseError> {
        parse_template(text, options)
    }

    /// Reads and parses a template file.
    ///
    /// # Errors
    /// Returns `ParseError` if reading or parsing fails.
    pub fn from_file(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        parse_template(&text, options)
    }

    /// Decodes an obfuscated template and parses it.
    ///
    /// # Errors
    /// Returns `ParseError` if the decoded bytes are not UTF-8 or the text
    /// is malformed.
    pub fn from_obfuscated(bytes: &[u8], options: ParseOptions) -> Result<Self, ParseError> {
        let text = String::from_utf8(obfuscate(bytes))?;
        parse_template(&text, options)
    }

    /// Sets the byte offset at which raw datagrams carry the command id.
    #[must_use]
    pub fn with_payload_offset(mut self, payload_offset: usize) -> Self {
        self.payload_offset = payload_offset;
        self
    }

    /// Returns the byte offset of the command id inside raw datagrams.
    #[must_use]
    pub const fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// Returns true if blocks and fields were sorted by keyword index.
    #[must_use]
    pub const fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Returns the lines that preceded the first packet.
    #[must_use]
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    /// Returns the keyword table.
    #[must_use]
    pub const fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Looks up the keyword index of a block or field name.
    #[must_use]
    pub fn keyword(&self, name: &str) -> Option<KeywordIndex> {
        self.keywords.lookup(name)
    }

    /// Returns the name of a keyword index.
    ///
    /// # Errors
    /// Returns [`SchemaError::KeywordNotFound`] for an unknown index.
    pub fn keyword_name(&self, keyword: KeywordIndex) -> Result<&str, SchemaError> {
        self.keywords.name(keyword)
    }

    /// Returns the packet map of a frequency class.
    #[must_use]
    pub const fn map(&self, frequency: Frequency) -> &PacketMap {
        match frequency {
            Frequency::High => &self.high,
            Frequency::Medium => &self.medium,
            Frequency::Low => &self.low,
            Frequency::Fixed => &self.fixed,
        }
    }

    fn map_mut(&mut self, frequency: Frequency) -> &mut PacketMap {
        match frequency {
            Frequency::High => &mut self.high,
            Frequency::Medium => &mut self.medium,
            Frequency::Low => &mut self.low,
            Frequency::Fixed => &mut self.fixed,
        }
    }

    /// Iterates every packet, class by class.
    pub fn packets(&self) -> impl Iterator<Item = &Packet> {
        Frequency::ALL.into_iter().flat_map(|f| self.map(f).iter())
    }

    /// Returns the total number of packets.
    #[must_use]
    pub fn packet_count(&self) -> usize {
        Frequency::ALL.iter().map(|&f| self.map(f).len()).sum()
    }

    /// Looks up a packet by name in every class.
    ///
    /// # Errors
    /// Returns [`SchemaError::PacketNotFound`] if no class has the name.
    pub fn packet_by_name(&self, name: &str) -> Result<&Packet, SchemaError> {
        Frequency::ALL
            .iter()
            .find_map(|&f| self.map(f).get_by_name(name))
            .ok_or_else(|| SchemaError::PacketNotFound {
                name: name.to_string(),
            })
    }

    /// Looks up a packet by command id and frequency.
    ///
    /// Fixed packets are framed as Low, so a Low lookup that misses falls
    /// through to the Fixed class.
    ///
    /// # Errors
    /// Returns [`SchemaError::PacketNotFound`] if the id is not assigned.
    pub fn packet_by_id(&self, id: u16, frequency: Frequency) -> Result<&Packet, SchemaError> {
        let found = match frequency {
            Frequency::Low => self.low.get_by_id(id).or_else(|| self.fixed.get_by_id(id)),
            other => self.map(other).get_by_id(id),
        };
        found.ok_or_else(|| SchemaError::PacketNotFound {
            name: format!("{frequency} {id}"),
        })
    }

    /// Resolves the packet of a raw datagram from its command framing.
    ///
    /// # Errors
    /// Returns an error if the framing is truncated or names no packet.
    pub fn packet_from_buffer(&self, raw: &[u8]) -> Result<&Packet, SchemaError> {
        let (frequency, id) = decode_command(raw, self.payload_offset)?;
        self.packet_by_id(id, frequency)
    }

    /// Returns the offset of the first block byte inside a raw datagram.
    #[must_use]
    pub const fn body_offset(&self, packet: &Packet) -> usize {
        self.payload_offset + packet.frequency.command_width()
    }

    /// Returns the block bytes of a raw datagram carrying `packet`.
    ///
    /// # Errors
    /// Returns [`SchemaError::Core`] if the datagram ends before the body.
    pub fn body<'a>(&self, packet: &Packet, raw: &'a [u8]) -> Result<&'a [u8], SchemaError> {
        let start = self.body_offset(packet);
        raw.get(start..)
            .ok_or_else(|| tmplwire_core::Error::short(start, raw.len()).into())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for packet in self.packets() {
            write!(f, "{} {} {}", packet.frequency, packet.id, packet.name)?;
            write!(
                f,
                " ({}, {}{})",
                if packet.trusted { "Trusted" } else { "NotTrusted" },
                if packet.zerocoded {
                    "Zerocoded"
                } else {
                    "Unencoded"
                },
                if packet.deprecated { ", Deprecated" } else { "" }
            )?;
            writeln!(f)?;
            for block in &packet.blocks {
                let name = self.keywords.name(block.keyword).unwrap_or("?");
                write!(f, "    {name} {}", block.arity)?;
                match block.size {
                    Some(size) => writeln!(f, " size {size}")?,
                    None => writeln!(f, " size variable")?,
                }
                for field in &block.fields {
                    let name = self.keywords.name(field.keyword).unwrap_or("?");
                    write!(f, "        {name} {}", field.field_type)?;
                    if field.counted {
                        write!(f, " {}", field.count)?;
                    }
                    match field.offset {
                        Some(offset) => writeln!(f, " @{offset}")?,
                        None => writeln!(f, " @?")?,
                    }
                }
            }
        }
        Ok(())
    }
}

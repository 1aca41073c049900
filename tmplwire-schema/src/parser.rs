//! Message template parser.
//!
//! The template language is line oriented and brace delimited:
//!
//! ```text
//! {
//!     PacketAck Fixed 0xFFFFFFFB NotTrusted Unencoded
//!     {
//!         Packets Variable
//!         {   ID  U32 }
//!     }
//! }
//! ```
//!
//! Parsing is a two-level state machine. The in-progress packet and block
//! are owned by the current [`State`] and only attached to the schema once
//! their closing brace is seen, so a failed parse never exposes a partial
//! packet.

use tmplwire_core::Frequency;

use crate::error::ParseError;
use crate::keywords::KeywordTable;
use crate::messages::{Block, Field, Packet};
use crate::template::Template;
use crate::types::{BlockArity, FieldType};

/// Mask exclusive-ored into explicit Fixed packet ids.
pub const FIXED_ID_MASK: u64 = 0xFFFF_0000;

/// Options controlling how a template is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reorder each packet's blocks and each block's fields by ascending
    /// keyword index. This changes the wire layout, so the runtime template
    /// and the code generator must agree on it.
    pub sort: bool,
    /// Tolerate unknown field types, block arities and packet frequencies
    /// the way the legacy loader did: warn, fall back to registry entry 0
    /// for types, and skip unknown blocks or packets.
    pub lenient: bool,
}

impl ParseOptions {
    /// Creates the default (declaration order, strict) options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sort: false,
            lenient: false,
        }
    }

    /// Enables or disables keyword sorting.
    #[must_use]
    pub const fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Enables or disables lenient keyword handling.
    #[must_use]
    pub const fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }
}

/// Parses template text into a [`Template`].
///
/// # Arguments
/// * `text` - Template source
/// * `options` - Sorting and leniency options
///
/// # Errors
/// Returns `ParseError` carrying the offending line if the template is
/// malformed, or names an unknown keyword in strict mode.
pub fn parse_template(text: &str, options: ParseOptions) -> Result<Template, ParseError> {
    let mut parser = Parser::new(options);
    let mut state = State::OutsidePacket;
    let mut last_line = 0;

    for (index, raw) in text.lines().enumerate() {
        last_line = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        state = parser.feed(state, last_line, line)?;
    }

    if !matches!(state, State::OutsidePacket) {
        return Err(ParseError::malformed(
            last_line,
            "",
            "unexpected end of template",
        ));
    }

    tracing::debug!(
        packets = parser.packets.len(),
        keywords = parser.keywords.len(),
        sorted = options.sort,
        "parsed message template"
    );
    Ok(Template::from_parts(
        parser.keywords,
        parser.packets,
        parser.preamble,
        options.sort,
    ))
}

/// Progress inside a packet entry.
#[derive(Debug)]
enum PacketScope {
    /// Waiting for the header line.
    Header,
    /// Header parsed, collecting blocks.
    Body(Packet),
    /// Unknown frequency in lenient mode; consumed but dropped.
    Skipped,
}

/// Progress inside a block entry.
#[derive(Debug)]
enum BlockScope {
    /// Waiting for the header line.
    Header,
    /// Header parsed, collecting fields.
    Body(Block),
    /// Unknown arity (or enclosing packet skipped); consumed but dropped.
    Skipped,
}

/// Parser state threaded through the line loop.
#[derive(Debug)]
enum State {
    OutsidePacket,
    InPacketHeaderOrBlock(PacketScope),
    InBlockHeaderOrField(PacketScope, BlockScope),
}

struct Parser {
    options: ParseOptions,
    keywords: KeywordTable,
    packets: Vec<Packet>,
    preamble: Vec<String>,
    next_high: u16,
    next_medium: u16,
    next_low: u16,
}

impl Parser {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            keywords: KeywordTable::new(),
            packets: Vec::new(),
            preamble: Vec::new(),
            next_high: 1,
            next_medium: 1,
            next_low: 1,
        }
    }

    fn feed(&mut self, state: State, line_no: usize, line: &str) -> Result<State, ParseError> {
        match state {
            State::OutsidePacket => match line {
                "{" => Ok(State::InPacketHeaderOrBlock(PacketScope::Header)),
                "}" => Err(ParseError::malformed(line_no, line, "unbalanced '}'")),
                _ => {
                    tracing::trace!(line = line_no, text = line, "template preamble");
                    self.preamble.push(line.to_string());
                    Ok(State::OutsidePacket)
                }
            },
            State::InPacketHeaderOrBlock(scope) => self.feed_packet(scope, line_no, line),
            State::InBlockHeaderOrField(packet, block) => {
                self.feed_block(packet, block, line_no, line)
            }
        }
    }

    fn feed_packet(
        &mut self,
        scope: PacketScope,
        line_no: usize,
        line: &str,
    ) -> Result<State, ParseError> {
        match (scope, line) {
            (PacketScope::Header, "{") => Err(ParseError::malformed(
                line_no,
                line,
                "block before packet header",
            )),
            (PacketScope::Header, "}") => {
                Err(ParseError::malformed(line_no, line, "empty packet entry"))
            }
            // The header position does not recognize comments.
            (PacketScope::Header, _) => Ok(State::InPacketHeaderOrBlock(
                self.parse_packet_header(line_no, line)?,
            )),
            (PacketScope::Skipped, "{") => Ok(State::InBlockHeaderOrField(
                PacketScope::Skipped,
                BlockScope::Skipped,
            )),
            (scope @ PacketScope::Body(_), "{") => {
                Ok(State::InBlockHeaderOrField(scope, BlockScope::Header))
            }
            (scope, "}") => {
                if let PacketScope::Body(mut packet) = scope {
                    if self.options.sort {
                        packet.sort_blocks();
                    }
                    tracing::debug!(
                        name = %packet.name,
                        id = packet.id,
                        frequency = %packet.frequency,
                        blocks = packet.blocks.len(),
                        "parsed packet"
                    );
                    self.packets.push(packet);
                }
                Ok(State::OutsidePacket)
            }
            (scope, _) if line.starts_with("//") => Ok(State::InPacketHeaderOrBlock(scope)),
            (PacketScope::Skipped, _) => Ok(State::InPacketHeaderOrBlock(PacketScope::Skipped)),
            (PacketScope::Body(_), _) => Err(ParseError::malformed(
                line_no,
                line,
                "expected block entry or '}'",
            )),
        }
    }

    fn feed_block(
        &mut self,
        packet: PacketScope,
        block: BlockScope,
        line_no: usize,
        line: &str,
    ) -> Result<State, ParseError> {
        if line == "}" {
            let packet = match (packet, block) {
                (PacketScope::Body(mut packet), BlockScope::Body(mut block)) => {
                    if self.options.sort {
                        block.sort_fields();
                    }
                    block.lay_out();
                    packet.add_block(block);
                    PacketScope::Body(packet)
                }
                (_, BlockScope::Header) => {
                    return Err(ParseError::malformed(line_no, line, "empty block entry"));
                }
                (packet, _) => packet,
            };
            return Ok(State::InPacketHeaderOrBlock(packet));
        }

        if line.starts_with("//") {
            return Ok(State::InBlockHeaderOrField(packet, block));
        }

        let block = match block {
            BlockScope::Skipped => BlockScope::Skipped,
            BlockScope::Header => {
                if line.starts_with('{') {
                    return Err(ParseError::malformed(
                        line_no,
                        line,
                        "field before block header",
                    ));
                }
                self.parse_block_header(line_no, line)?
            }
            BlockScope::Body(mut block) => {
                if !line.starts_with('{') {
                    return Err(ParseError::malformed(
                        line_no,
                        line,
                        "expected field entry or '}'",
                    ));
                }
                block.add_field(self.parse_field(line_no, line)?);
                BlockScope::Body(block)
            }
        };
        Ok(State::InBlockHeaderOrField(packet, block))
    }

    /// Parses `name frequency [id] trust encoding [deprecated]`.
    fn parse_packet_header(&mut self, line_no: usize, line: &str) -> Result<PacketScope, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(ParseError::malformed(
                line_no,
                line,
                "missing packet frequency",
            ));
        }

        let name = tokens[0];
        let Some(frequency) = Frequency::parse(tokens[1]) else {
            if self.options.lenient {
                tracing::warn!(
                    line = line_no,
                    packet = name,
                    frequency = tokens[1],
                    "skipping packet with unknown frequency"
                );
                return Ok(PacketScope::Skipped);
            }
            return Err(ParseError::UnknownFrequency {
                line: line_no,
                text: line.to_string(),
                frequency: tokens[1].to_string(),
            });
        };

        // Fixed headers carry an explicit id; the others shift left by one.
        let flags_at = if frequency == Frequency::Fixed { 3 } else { 2 };
        if tokens.len() < flags_at + 2 {
            return Err(ParseError::malformed(
                line_no,
                line,
                "missing trust or encoding flag",
            ));
        }

        let id = match frequency {
            Frequency::Fixed => {
                let literal = tokens[2];
                let digits = literal.strip_prefix("0x").unwrap_or(literal);
                let raw = u64::from_str_radix(digits, 16).map_err(|_| {
                    ParseError::malformed(line_no, line, format!("invalid packet id '{literal}'"))
                })?;
                // The legacy truncation: exclusive-or with the mask, keep the
                // low 16 bits.
                (raw ^ FIXED_ID_MASK) as u16
            }
            Frequency::High => next_id(&mut self.next_high),
            Frequency::Medium => next_id(&mut self.next_medium),
            Frequency::Low => next_id(&mut self.next_low),
        };

        let mut packet = Packet::new(name, frequency, id);
        packet.trusted = tokens[flags_at] == "Trusted";
        packet.zerocoded = tokens[flags_at + 1] == "Zerocoded";
        packet.deprecated = tokens
            .get(flags_at + 2)
            .is_some_and(|t| t.contains("Deprecated"));
        Ok(PacketScope::Body(packet))
    }

    /// Parses `name Single|Multiple N|Variable`.
    fn parse_block_header(&mut self, line_no: usize, line: &str) -> Result<BlockScope, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(ParseError::malformed(line_no, line, "missing block arity"));
        }

        let arity = match tokens[1] {
            "Single" => BlockArity::Single,
            "Variable" => BlockArity::Variable,
            "Multiple" => {
                let count = tokens.get(2).ok_or_else(|| {
                    ParseError::malformed(line_no, line, "missing block count")
                })?;
                let count = count.parse().map_err(|_| {
                    ParseError::malformed(line_no, line, format!("invalid block count '{count}'"))
                })?;
                BlockArity::Multiple(count)
            }
            other => {
                if self.options.lenient {
                    tracing::warn!(
                        line = line_no,
                        block = tokens[0],
                        arity = other,
                        "skipping block with unknown arity"
                    );
                    return Ok(BlockScope::Skipped);
                }
                return Err(ParseError::UnknownBlockArity {
                    line: line_no,
                    text: line.to_string(),
                    arity: other.to_string(),
                });
            }
        };

        let keyword = self.keywords.intern(tokens[0]);
        Ok(BlockScope::Body(Block::new(keyword, arity)))
    }

    /// Parses `{ name type count-or-"}"`.
    fn parse_field(&mut self, line_no: usize, line: &str) -> Result<Field, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(ParseError::malformed(
                line_no,
                line,
                "expected '{ name type count }'",
            ));
        }

        let type_name = tokens[2];
        let field_type = match FieldType::lookup(type_name) {
            Some(field_type) => field_type,
            None if self.options.lenient => {
                tracing::warn!(
                    line = line_no,
                    field = tokens[1],
                    type_name,
                    "unknown field type, using {}",
                    FieldType::ALL[0]
                );
                FieldType::lookup_or_default(type_name)
            }
            None => {
                return Err(ParseError::UnknownFieldType {
                    line: line_no,
                    text: line.to_string(),
                    type_name: type_name.to_string(),
                });
            }
        };

        let keyword = self.keywords.intern(tokens[1]);
        if tokens[3] == "}" {
            return Ok(Field::new(keyword, field_type));
        }

        let count = tokens[3].parse().map_err(|_| {
            ParseError::malformed(
                line_no,
                line,
                format!("invalid field count '{}'", tokens[3]),
            )
        })?;
        Ok(Field::with_count(keyword, field_type, count))
    }
}

fn next_id(counter: &mut u16) -> u16 {
    let id = *counter;
    *counter = counter.wrapping_add(1);
    id
}

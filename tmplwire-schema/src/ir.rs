//! Intermediate representation for code generation.
//!
//! The schema model stores keyword indices; the IR resolves them back to
//! names and precomputes the Rust identifiers the generator emits.

use tmplwire_core::Frequency;

use crate::error::SchemaError;
use crate::messages::{Block, Field, Packet};
use crate::template::Template;
use crate::types::{BlockArity, FieldType};

/// Intermediate representation of a whole template.
#[derive(Debug, Clone)]
pub struct TemplateIr {
    /// Packets in frequency-class order (High, Medium, Low, Fixed).
    pub packets: Vec<ResolvedPacket>,
    /// Whether the template was parsed with keyword sorting.
    pub sorted: bool,
}

impl TemplateIr {
    /// Resolves every packet of the template.
    ///
    /// # Errors
    /// Returns [`SchemaError::KeywordNotFound`] if an entity refers to a
    /// keyword missing from the table.
    pub fn from_template(template: &Template) -> Result<Self, SchemaError> {
        let packets = template
            .packets()
            .map(|packet| ResolvedPacket::from_packet(template, packet))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            packets,
            sorted: template.is_sorted(),
        })
    }

    /// Gets a packet by template name.
    #[must_use]
    pub fn get_packet(&self, name: &str) -> Option<&ResolvedPacket> {
        self.packets.iter().find(|p| p.name == name)
    }
}

/// Resolved packet definition.
#[derive(Debug, Clone)]
pub struct ResolvedPacket {
    /// Template name.
    pub name: String,
    /// Variant name in the generated `PacketType` enum.
    pub variant: String,
    /// Generated struct name.
    pub struct_name: String,
    /// Command id.
    pub id: u16,
    /// Frequency class.
    pub frequency: Frequency,
    /// Trusted flag.
    pub trusted: bool,
    /// Zerocoded flag.
    pub zerocoded: bool,
    /// Deprecated flag.
    pub deprecated: bool,
    /// Blocks in wire order.
    pub blocks: Vec<ResolvedBlock>,
}

impl ResolvedPacket {
    fn from_packet(template: &Template, packet: &Packet) -> Result<Self, SchemaError> {
        let variant = to_pascal_case(&packet.name);
        let blocks = packet
            .blocks
            .iter()
            .map(|block| ResolvedBlock::from_block(template, &variant, block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: packet.name.clone(),
            struct_name: format!("{variant}Packet"),
            variant,
            id: packet.id,
            frequency: packet.frequency,
            trusted: packet.trusted,
            zerocoded: packet.zerocoded,
            deprecated: packet.deprecated,
            blocks,
        })
    }
}

/// Resolved block definition.
#[derive(Debug, Clone)]
pub struct ResolvedBlock {
    /// Template name.
    pub name: String,
    /// Generated struct name, `{Packet}{Block}Block`.
    pub struct_name: String,
    /// Member name inside the packet struct.
    pub field_name: String,
    /// Repeat arity.
    pub arity: BlockArity,
    /// Static instance width, if known.
    pub size: Option<usize>,
    /// Fields in wire order.
    pub fields: Vec<ResolvedField>,
}

impl ResolvedBlock {
    fn from_block(template: &Template, packet: &str, block: &Block) -> Result<Self, SchemaError> {
        let name = template.keyword_name(block.keyword)?.to_string();
        let fields = block
            .fields
            .iter()
            .map(|field| ResolvedField::from_field(template, field))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            struct_name: format!("{packet}{}Block", to_pascal_case(&name)),
            field_name: to_field_ident(&name),
            name,
            arity: block.arity,
            size: block.size,
            fields,
        })
    }

    /// Returns true if the packet holds this block by value.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self.arity, BlockArity::Single)
    }
}

/// Resolved field definition.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Template name.
    pub name: String,
    /// Member name inside the block struct.
    pub field_name: String,
    /// Wire type.
    pub field_type: FieldType,
    /// Fixed length or Variable prefix width.
    pub count: usize,
    /// Static offset within the block.
    pub offset: Option<usize>,
}

impl ResolvedField {
    fn from_field(template: &Template, field: &Field) -> Result<Self, SchemaError> {
        let name = template.keyword_name(field.keyword)?.to_string();
        Ok(Self {
            field_name: to_field_ident(&name),
            name,
            field_type: field.field_type,
            count: field.count,
            offset: field.offset,
        })
    }

    /// Returns the Rust type of the generated member.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        self.field_type.rust_type()
    }
}

/// Identifiers that cannot name a struct member.
const RESERVED: [&str; 52] = [
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield", "union",
];

/// Converts a template name to a snake_case member name, keeping acronym
/// runs together (`AgentID` becomes `agent_id`).
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a name to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Snake-cases a name and suffixes an underscore if it collides with a
/// Rust keyword.
#[must_use]
pub fn to_field_ident(s: &str) -> String {
    let mut ident = to_snake_case(s);
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("AgentID"), "agent_id");
        assert_eq!(to_snake_case("OldestUnacked"), "oldest_unacked");
        assert_eq!(to_snake_case("IPPort"), "ip_port");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("Data1"), "data1");
        assert_eq!(to_snake_case("ObjectData2Name"), "object_data2_name");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("packet_ack"), "PacketAck");
        assert_eq!(to_pascal_case("StartPingCheck"), "StartPingCheck");
        assert_eq!(to_pascal_case("agentUpdate"), "AgentUpdate");
    }

    #[test]
    fn test_to_field_ident_escapes_keywords() {
        assert_eq!(to_field_ident("Type"), "type_");
        assert_eq!(to_field_ident("Match"), "match_");
        assert_eq!(to_field_ident("Channel"), "channel");
    }

    #[test]
    fn test_resolve_template() {
        let text = "
{
    ChatFromViewer Low NotTrusted Unencoded
    {
        AgentData Single
        {   AgentID UUID    }
    }
    {
        ChatData Variable
        {   Message Variable 2  }
        {   Type    U8  }
    }
}
";
        let template = Template::parse(text, ParseOptions::default()).unwrap();
        let ir = TemplateIr::from_template(&template).unwrap();
        let packet = ir.get_packet("ChatFromViewer").unwrap();
        assert_eq!(packet.struct_name, "ChatFromViewerPacket");
        assert_eq!(packet.variant, "ChatFromViewer");
        assert_eq!(packet.blocks.len(), 2);

        let agent = &packet.blocks[0];
        assert!(agent.is_single());
        assert_eq!(agent.struct_name, "ChatFromViewerAgentDataBlock");
        assert_eq!(agent.field_name, "agent_data");
        assert_eq!(agent.fields[0].field_name, "agent_id");
        assert_eq!(agent.fields[0].rust_type(), "Uuid");

        let chat = &packet.blocks[1];
        assert!(!chat.is_single());
        assert_eq!(chat.fields[1].field_name, "type_");
        assert_eq!(chat.fields[0].count, 2);
    }
}

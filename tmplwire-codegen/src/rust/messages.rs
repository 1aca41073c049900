//! Packet struct and codec code generation.

use tmplwire_schema::BlockArity;
use tmplwire_schema::ir::{ResolvedBlock, ResolvedPacket};

use super::blocks::BlockGenerator;

/// Generator for packet structs and their [`TemplatePacket`] impls.
///
/// [`TemplatePacket`]: tmplwire_core::TemplatePacket
pub struct MessageGenerator<'a> {
    packet: &'a ResolvedPacket,
}

impl<'a> MessageGenerator<'a> {
    /// Creates a message generator for one packet.
    #[must_use]
    pub fn new(packet: &'a ResolvedPacket) -> Self {
        Self { packet }
    }

    /// Generates the block structs, the packet struct and its impls.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str(&BlockGenerator::new(self.packet).generate());
        output.push_str(&self.generate_struct());
        output.push_str(&self.generate_packet_impl());
        output.push_str(&self.generate_display());
        output
    }

    fn generate_struct(&self) -> String {
        let packet = self.packet;
        let mut output = String::new();

        output.push_str(&format!(
            "/// `{}` packet ({} {}).\n",
            packet.name, packet.frequency, packet.id
        ));
        if packet.deprecated {
            output.push_str("///\n/// Marked deprecated in the template.\n");
        }
        output.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
        output.push_str(&format!("pub struct {} {{\n", packet.struct_name));
        for block in &packet.blocks {
            let ty = if block.is_single() {
                block.struct_name.clone()
            } else {
                format!("Vec<{}>", block.struct_name)
            };
            output.push_str(&format!("    /// `{}` ({}).\n", block.name, block.arity));
            output.push_str(&format!("    pub {}: {},\n", block.field_name, ty));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_packet_impl(&self) -> String {
        let packet = self.packet;
        let mut output = String::new();

        output.push_str(&format!(
            "impl TemplatePacket for {} {{\n",
            packet.struct_name
        ));
        output.push_str(&format!(
            "    const NAME: &'static str = \"{}\";\n",
            packet.name
        ));
        output.push_str(&format!("    const ID: u16 = {};\n", packet.id));
        output.push_str(&format!(
            "    const FREQUENCY: Frequency = Frequency::{:?};\n",
            packet.frequency
        ));
        output.push_str(&format!("    const TRUSTED: bool = {};\n", packet.trusted));
        output.push_str(&format!(
            "    const ZEROCODED: bool = {};\n",
            packet.zerocoded
        ));
        output.push_str(&format!(
            "    const DEPRECATED: bool = {};\n\n",
            packet.deprecated
        ));

        output.push_str("    fn encode_body(&self, writer: &mut WireWriter<'_>) -> Result<()> {\n");
        if packet.blocks.is_empty() {
            output.push_str("        let _ = writer;\n");
        }
        for block in &packet.blocks {
            output.push_str(&encode_block(block));
        }
        output.push_str("        Ok(())\n");
        output.push_str("    }\n\n");

        output.push_str("    fn decode_body(reader: &mut WireReader<'_>) -> Result<Self> {\n");
        if packet.blocks.is_empty() {
            output.push_str("        let _ = reader;\n");
        }
        output.push_str("        Ok(Self {\n");
        for block in &packet.blocks {
            output.push_str(&format!(
                "            {}: {},\n",
                block.field_name,
                decode_block(block)
            ));
        }
        output.push_str("        })\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_display(&self) -> String {
        let packet = self.packet;
        let mut output = String::new();

        output.push_str(&format!("impl fmt::Display for {} {{\n", packet.struct_name));
        output.push_str("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {\n");
        output.push_str(&format!("        writeln!(f, \"--- {} ---\")?;\n", packet.name));
        for block in &packet.blocks {
            if block.is_single() {
                output.push_str(&format!("        writeln!(f, \"-- {} --\")?;\n", block.name));
                output.push_str(&format!(
                    "        write!(f, \"{{}}\", self.{})?;\n",
                    block.field_name
                ));
            } else {
                output.push_str(&format!(
                    "        for (i, block) in self.{}.iter().enumerate() {{\n",
                    block.field_name
                ));
                output.push_str(&format!(
                    "            writeln!(f, \"-- {} [{{i}}] --\")?;\n",
                    block.name
                ));
                output.push_str("            write!(f, \"{block}\")?;\n");
                output.push_str("        }\n");
            }
        }
        output.push_str("        Ok(())\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}

fn encode_block(block: &ResolvedBlock) -> String {
    let member = &block.field_name;
    match block.arity {
        BlockArity::Single => format!("        self.{member}.encode(writer)?;\n"),
        BlockArity::Multiple(count) => format!(
            "        writer.expect_count(\"{}\", {count}, self.{member}.len())?;\n\
             \x20       for block in &self.{member} {{\n\
             \x20           block.encode(writer)?;\n\
             \x20       }}\n",
            block.name
        ),
        BlockArity::Variable => format!(
            "        writer.write_count(\"{}\", self.{member}.len())?;\n\
             \x20       for block in &self.{member} {{\n\
             \x20           block.encode(writer)?;\n\
             \x20       }}\n",
            block.name
        ),
    }
}

fn decode_block(block: &ResolvedBlock) -> String {
    let ty = &block.struct_name;
    match block.arity {
        BlockArity::Single => format!("{ty}::decode(reader)?"),
        BlockArity::Multiple(count) => format!(
            "(0..{count}).map(|_| {ty}::decode(reader)).collect::<Result<Vec<_>>>()?"
        ),
        BlockArity::Variable => format!(
            "{{\n\
             \x20               let count = reader.read_count()?;\n\
             \x20               (0..count).map(|_| {ty}::decode(reader)).collect::<Result<Vec<_>>>()?\n\
             \x20           }}"
        ),
    }
}

//! Block struct code generation.
//!
//! Every template block becomes one plain struct, `{Packet}{Block}Block`,
//! with a typed member per field and private `encode`/`decode` helpers that
//! the packet codec calls once per instance.

use tmplwire_schema::FieldType;
use tmplwire_schema::ir::{ResolvedBlock, ResolvedField, ResolvedPacket};

/// Generator for block structs.
pub struct BlockGenerator<'a> {
    packet: &'a ResolvedPacket,
}

impl<'a> BlockGenerator<'a> {
    /// Creates a block generator for one packet.
    #[must_use]
    pub fn new(packet: &'a ResolvedPacket) -> Self {
        Self { packet }
    }

    /// Generates every block struct of the packet.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for block in &self.packet.blocks {
            output.push_str(&self.generate_struct(block));
            output.push_str(&self.generate_codec(block));
            output.push_str(&self.generate_display(block));
        }
        output
    }

    fn generate_struct(&self, block: &ResolvedBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "/// `{}` block of `{}` ({}).\n",
            block.name, self.packet.name, block.arity
        ));
        output.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
        output.push_str(&format!("pub struct {} {{\n", block.struct_name));
        for field in &block.fields {
            output.push_str(&format!(
                "    /// `{}` ({}{}).\n",
                field.name,
                field.field_type,
                count_suffix(field)
            ));
            output.push_str(&format!(
                "    pub {}: {},\n",
                field.field_name,
                field.rust_type()
            ));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_codec(&self, block: &ResolvedBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!("impl {} {{\n", block.struct_name));
        match block.size {
            Some(size) => output.push_str(&format!(
                "    /// Encoded width of one instance.\n\
                 \x20   pub const SIZE: Option<usize> = Some({size});\n\n"
            )),
            None => output.push_str(
                "    /// Encoded width of one instance; depends on the data.\n\
                 \x20   pub const SIZE: Option<usize> = None;\n\n",
            ),
        }

        output.push_str("    fn encode(&self, writer: &mut WireWriter<'_>) -> Result<()> {\n");
        if block.fields.is_empty() {
            output.push_str("        let _ = writer;\n");
        }
        for field in &block.fields {
            output.push_str(&format!("        {}\n", encode_statement(field)));
        }
        output.push_str("        Ok(())\n");
        output.push_str("    }\n\n");

        output.push_str("    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {\n");
        if block.fields.is_empty() {
            output.push_str("        let _ = reader;\n");
        }
        output.push_str("        Ok(Self {\n");
        for field in &block.fields {
            output.push_str(&format!(
                "            {}: {},\n",
                field.field_name,
                decode_expression(field)
            ));
        }
        output.push_str("        })\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_display(&self, block: &ResolvedBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!("impl fmt::Display for {} {{\n", block.struct_name));
        output.push_str("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {\n");
        if block.fields.is_empty() {
            output.push_str("        let _ = f;\n");
        }
        for field in &block.fields {
            output.push_str(&format!(
                "        writeln!(f, \"{}: {{}}\", {})?;\n",
                field.name,
                display_expression(field)
            ));
        }
        output.push_str("        Ok(())\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}

fn count_suffix(field: &ResolvedField) -> String {
    match field.field_type {
        FieldType::Fixed | FieldType::Variable => format!(" {}", field.count),
        _ => String::new(),
    }
}

/// Statement appending one field to `writer`.
fn encode_statement(field: &ResolvedField) -> String {
    let name = &field.field_name;
    match field.field_type {
        FieldType::Fixed => format!("writer.write_fixed(&self.{name}, {})?;", field.count),
        FieldType::Variable => format!("writer.write_variable(&self.{name}, {})?;", field.count),
        FieldType::IpPort => format!("writer.write_u16_be(self.{name});"),
        _ => format!("writer.write(&self.{name});"),
    }
}

/// Expression reading one field from `reader`.
fn decode_expression(field: &ResolvedField) -> String {
    match field.field_type {
        FieldType::Fixed => format!("reader.read_fixed({})?", field.count),
        FieldType::Variable => format!("reader.read_variable({})?", field.count),
        FieldType::IpPort => "reader.read_u16_be()?".to_string(),
        _ => "reader.read()?".to_string(),
    }
}

fn display_expression(field: &ResolvedField) -> String {
    let name = &field.field_name;
    match field.field_type {
        FieldType::Fixed | FieldType::Variable => format!("BytesDisplay(&self.{name})"),
        FieldType::IpAddr => format!("std::net::Ipv4Addr::from(self.{name}.to_le_bytes())"),
        _ => format!("self.{name}"),
    }
}

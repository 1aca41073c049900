//! Top-level code generator.
//!
//! Assembles the per-packet units and the dispatch enums into one Rust
//! source file, optionally also writing one file per packet.

use std::fs;
use std::path::Path;

use tmplwire_schema::TemplateIr;
use tmplwire_schema::ir::{ResolvedPacket, to_snake_case};

use crate::error::CodegenError;
use crate::rust::{EnumGenerator, MessageGenerator};

/// Crate path generated code imports its runtime from by default.
pub const DEFAULT_RUNTIME_PATH: &str = "tmplwire_core";

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Text written verbatim at the head of every generated file.
    pub boilerplate: String,
    /// Path of the crate providing `TemplatePacket`, `WireReader` and the
    /// other runtime items, e.g. `tmplwire::core`.
    pub runtime_path: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            boilerplate: String::new(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Sets the boilerplate header.
    #[must_use]
    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = boilerplate.into();
        self
    }

    /// Sets the runtime crate path.
    #[must_use]
    pub fn with_runtime_path(mut self, runtime_path: impl Into<String>) -> Self {
        self.runtime_path = runtime_path.into();
        self
    }
}

/// One generated per-packet source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Template packet name.
    pub packet: String,
    /// File name, `{snake_case_name}.rs`.
    pub file_name: String,
    /// Complete source text, header included.
    pub code: String,
}

/// Rust code generator for a resolved template.
pub struct Generator<'a> {
    ir: &'a TemplateIr,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    #[must_use]
    pub fn new(ir: &'a TemplateIr) -> Self {
        Self::with_config(ir, GeneratorConfig::default())
    }

    /// Creates a generator with an explicit configuration.
    #[must_use]
    pub fn with_config(ir: &'a TemplateIr, config: GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Generates the aggregate source: header, every packet unit, then the
    /// dispatch enums.
    ///
    /// # Errors
    /// Returns [`CodegenError::Generation`] if the template has no packets.
    pub fn generate(&self) -> Result<String, CodegenError> {
        if self.ir.packets.is_empty() {
            return Err(CodegenError::generation("template defines no packets"));
        }
        tracing::debug!(
            packets = self.ir.packets.len(),
            sorted = self.ir.sorted,
            "generating aggregate source"
        );

        let mut output = self.generate_header();
        output.push_str(&format!(
            "/// Whether the template was parsed with keyword sorting.\n\
             pub const TEMPLATE_SORTED: bool = {};\n\n",
            self.ir.sorted
        ));
        for packet in &self.ir.packets {
            output.push_str(&self.generate_packet(packet));
        }
        output.push_str(&EnumGenerator::new(self.ir).generate());
        Ok(output)
    }

    /// Generates one standalone file per packet.
    #[must_use]
    pub fn generate_split(&self) -> Vec<GeneratedUnit> {
        self.ir
            .packets
            .iter()
            .map(|packet| {
                let mut code = self.generate_header();
                code.push_str(&self.generate_packet(packet));
                GeneratedUnit {
                    packet: packet.name.clone(),
                    file_name: format!("{}.rs", to_snake_case(&packet.name)),
                    code,
                }
            })
            .collect()
    }

    /// Generates the block structs and packet codec of one packet.
    #[must_use]
    pub fn generate_packet(&self, packet: &ResolvedPacket) -> String {
        tracing::debug!(packet = %packet.name, blocks = packet.blocks.len(), "generating packet");
        MessageGenerator::new(packet).generate()
    }

    /// Writes the aggregate source to `output` and, with `split_dir`, one
    /// file per packet into that directory.
    ///
    /// # Errors
    /// Returns an error if generation fails or a file cannot be written.
    pub fn write_files(&self, output: &Path, split_dir: Option<&Path>) -> Result<(), CodegenError> {
        fs::write(output, self.generate()?)?;
        tracing::info!(path = %output.display(), "wrote generated source");

        if let Some(dir) = split_dir {
            fs::create_dir_all(dir)?;
            let units = self.generate_split();
            for unit in &units {
                fs::write(dir.join(&unit.file_name), &unit.code)?;
            }
            tracing::info!(dir = %dir.display(), files = units.len(), "wrote per-packet sources");
        }
        Ok(())
    }

    fn generate_header(&self) -> String {
        let mut output = String::new();
        if !self.config.boilerplate.is_empty() {
            output.push_str(&self.config.boilerplate);
            if !self.config.boilerplate.ends_with('\n') {
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str("// Generated by tmplwire-codegen. Do not edit.\n\n");
        output.push_str("#[allow(unused_imports)]\n");
        output.push_str("use std::fmt;\n");
        output.push_str("#[allow(unused_imports)]\n");
        output.push_str(&format!(
            "use {}::{{\n    BytesDisplay, Error, Frequency, Quaternion, Result, TemplatePacket, Uuid, Vector3,\n    \
             Vector3d, Vector4, WireReader, WireWriter,\n}};\n\n",
            self.config.runtime_path
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmplwire_schema::{ParseOptions, Template};

    const TEMPLATE: &str = "
{
    StartPingCheck High NotTrusted Unencoded
    {
        PingID Single
        {   PingID  U8  }
        {   OldestUnacked   U32 }
    }
}
{
    UseCircuitCode Low NotTrusted Unencoded
    {
        CircuitCode Single
        {   Code    U32 }
        {   SessionID   LLUUID  }
    }
}
";

    fn create_test_ir() -> TemplateIr {
        let template = Template::parse(TEMPLATE, ParseOptions::default()).expect("Failed to parse");
        TemplateIr::from_template(&template).expect("Failed to resolve")
    }

    #[test]
    fn test_generate_aggregate() {
        let ir = create_test_ir();
        let config = GeneratorConfig::default().with_boilerplate("// Copyright header");
        let output = Generator::with_config(&ir, config).generate().unwrap();

        assert!(output.starts_with("// Copyright header\n"));
        assert!(output.contains("use tmplwire_core::{"));
        assert!(output.contains("pub const TEMPLATE_SORTED: bool = false;"));
        assert!(output.contains("pub struct StartPingCheckPacket"));
        assert!(output.contains("pub struct UseCircuitCodePacket"));
        assert!(output.contains("pub enum PacketType"));

        let packets = output.find("pub struct UseCircuitCodePacket").unwrap();
        let dispatch = output.find("pub enum PacketType").unwrap();
        assert!(packets < dispatch);
    }

    #[test]
    fn test_runtime_path() {
        let ir = create_test_ir();
        let config = GeneratorConfig::default().with_runtime_path("tmplwire::core");
        let output = Generator::with_config(&ir, config).generate().unwrap();
        assert!(output.contains("use tmplwire::core::{"));
        assert!(!output.contains("use tmplwire_core::{"));
    }

    #[test]
    fn test_generate_split() {
        let ir = create_test_ir();
        let units = Generator::new(&ir).generate_split();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].file_name, "start_ping_check.rs");
        assert_eq!(units[1].packet, "UseCircuitCode");
        assert!(units[1].code.contains("pub struct UseCircuitCodePacket"));
        assert!(!units[1].code.contains("StartPingCheckPacket"));
        assert!(!units[1].code.contains("pub enum PacketType"));
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let template = Template::parse("version 2.0\n", ParseOptions::default()).unwrap();
        let ir = TemplateIr::from_template(&template).unwrap();
        assert!(matches!(
            Generator::new(&ir).generate(),
            Err(CodegenError::Generation { .. })
        ));
    }

    #[test]
    fn test_write_files() {
        let ir = create_test_ir();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("packets.rs");
        let split = dir.path().join("split");

        Generator::new(&ir)
            .write_files(&output, Some(&split))
            .unwrap();

        let aggregate = std::fs::read_to_string(&output).unwrap();
        assert!(aggregate.contains("pub enum AnyPacket"));
        assert!(split.join("start_ping_check.rs").exists());
        assert!(split.join("use_circuit_code.rs").exists());
    }
}

//! # tmplwire Codegen
//!
//! Rust code generation from message templates.
//!
//! This crate provides:
//! - One typed struct per template block and per packet
//! - `TemplatePacket` encode/decode implementations and `Display` output
//! - A `PacketType` dispatch table and `AnyPacket` decoding helper
//! - Build script integration and the `tmplwire-codegen` binary
//!
//! The template must be parsed with the same sort mode the runtime
//! [`tmplwire_schema::Template`] uses, or the generated wire layout will
//! disagree with the offset calculator.

pub mod error;
pub mod generator;
pub mod rust;

use std::path::Path;

use tmplwire_schema::{ParseOptions, Template, TemplateIr, validate_template};

pub use error::CodegenError;
pub use generator::{GeneratedUnit, Generator, GeneratorConfig};

/// Generates Rust code from template text.
///
/// # Arguments
/// * `text` - Template source
/// * `options` - Sorting and leniency options
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, or generation fails.
pub fn generate_from_text(text: &str, options: ParseOptions) -> Result<String, CodegenError> {
    let template = Template::parse(text, options)?;
    generate_from_template(&template, GeneratorConfig::default())
}

/// Generates Rust code from a template file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation, or generation
/// fails.
pub fn generate_from_file(path: &Path, options: ParseOptions) -> Result<String, CodegenError> {
    let template = Template::from_file(path, options)?;
    generate_from_template(&template, GeneratorConfig::default())
}

/// Validates a parsed template and generates Rust code from it.
///
/// # Errors
/// Returns `CodegenError` if validation or generation fails.
pub fn generate_from_template(
    template: &Template,
    config: GeneratorConfig,
) -> Result<String, CodegenError> {
    validate_template(template)?;
    let ir = TemplateIr::from_template(template)?;
    Generator::with_config(&ir, config).generate()
}

//! tmplwire-codegen - generate Rust packet codecs from a message template
//!
//! # Usage
//!
//! ```bash
//! tmplwire-codegen message_template.msg boilerplate.txt src/packets.rs
//! tmplwire-codegen --sort --split-dir src/packets message_template.msg header.txt src/packets.rs
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tmplwire_codegen::{Generator, GeneratorConfig, generator::DEFAULT_RUNTIME_PATH};
use tmplwire_schema::{ParseOptions, Template, TemplateIr, validate_template};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Generate Rust packet codecs from a message template
#[derive(Parser, Debug)]
#[command(name = "tmplwire-codegen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Message template file
    template: PathBuf,

    /// File whose contents are written verbatim at the head of the output
    boilerplate: PathBuf,

    /// Output Rust source file
    output: PathBuf,

    /// Sort blocks and fields by keyword index (must match the runtime)
    #[arg(long)]
    sort: bool,

    /// Warn and continue on unknown types, arities and frequencies
    #[arg(long)]
    lenient: bool,

    /// The template file is obfuscated
    #[arg(long)]
    obfuscated: bool,

    /// Also write one file per packet into this directory
    #[arg(long, value_name = "DIR")]
    split_dir: Option<PathBuf>,

    /// Crate path generated code imports the runtime from
    #[arg(long, default_value = DEFAULT_RUNTIME_PATH)]
    runtime_path: String,

    /// Print the parsed packet map to stdout
    #[arg(long)]
    print_map: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let options = ParseOptions::new().sorted(cli.sort).lenient(cli.lenient);
    let template = load_template(&cli, options)?;
    validate_template(&template).context("template validation failed")?;
    tracing::info!(
        packets = template.packet_count(),
        keywords = template.keywords().len(),
        "loaded template"
    );

    if cli.print_map {
        print!("{template}");
    }

    let boilerplate = fs::read_to_string(&cli.boilerplate)
        .with_context(|| format!("failed to read boilerplate {}", cli.boilerplate.display()))?;
    let config = GeneratorConfig::default()
        .with_boilerplate(boilerplate)
        .with_runtime_path(cli.runtime_path.as_str());

    let ir = TemplateIr::from_template(&template)?;
    Generator::with_config(&ir, config)
        .write_files(&cli.output, cli.split_dir.as_deref())
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    Ok(())
}

fn load_template(cli: &Cli, options: ParseOptions) -> Result<Template> {
    let path = &cli.template;
    let template = if cli.obfuscated {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Template::from_obfuscated(&bytes, options)
    } else {
        Template::from_file(path, options)
    };
    template.with_context(|| format!("failed to parse template {}", path.display()))
}

/// Initialize the tracing subscriber for logging
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

//! Generates the demo packet codecs used by the integration tests.

use std::env;
use std::fs;
use std::path::PathBuf;

use tmplwire_codegen::{GeneratorConfig, generate_from_template};
use tmplwire_schema::{ParseOptions, Template};

const DEMO_TEMPLATE: &str = "templates/demo.msg";

fn main() {
    println!("cargo:rerun-if-changed={DEMO_TEMPLATE}");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    for (file_name, sort) in [("demo_packets.rs", false), ("demo_packets_sorted.rs", true)] {
        let options = ParseOptions::new().sorted(sort);
        let template = Template::from_file(DEMO_TEMPLATE, options)
            .unwrap_or_else(|e| panic!("failed to parse {DEMO_TEMPLATE}: {e}"));
        let config = GeneratorConfig::default()
            .with_boilerplate("// Demo packets for the tmplwire integration tests.")
            .with_runtime_path("tmplwire::core");
        let code = generate_from_template(&template, config)
            .unwrap_or_else(|e| panic!("failed to generate {file_name}: {e}"));
        fs::write(out_dir.join(file_name), code)
            .unwrap_or_else(|e| panic!("failed to write {file_name}: {e}"));
    }
}

//! Example: Print the canonical form of a project file
//!
//! This example runs the default rules over a file and writes the
//! canonical document to stdout, listing violations on stderr. The file
//! itself is not modified.
//!
//! Usage: cargo run --example canonicalize <pom.xml>

use std::env;
use std::fs;
use std::io::{self, Write};

use pom_enforcer::EnforcerConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <pom.xml>", args[0]);
        std::process::exit(1);
    }

    let pom_file = &args[1];
    let enforcer = EnforcerConfig::default().build()?;

    eprintln!("Reading: {}", pom_file);
    let bytes = fs::read(pom_file)?;

    let (canonical, violations) = enforcer.canonicalize(&bytes)?;
    if violations.is_empty() {
        eprintln!("Already canonical.");
    }
    for violation in &violations {
        eprintln!("{}", violation);
    }

    io::stdout().write_all(&canonical)?;
    Ok(())
}

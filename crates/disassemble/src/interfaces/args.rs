use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use std::path::Path;

use crate::core::decode_hex_lossy;

/// Arguments for the disassembly subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Disassemble EVM bytecode to assembly",
    override_usage = "hugin disassemble <TARGET> [OPTIONS]"
)]
pub struct DisassemblerArgs {
    /// The target to disassemble, either a file containing hex bytecode or a
    /// raw hex bytecode string.
    #[clap(required = true)]
    pub target: String,

    /// Whether to use base-10 for the program counter.
    #[clap(long = "decimal-counter", short = 'd')]
    pub decimal_counter: bool,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to, or 'print' to print to
    /// the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl DisassemblerArgs {
    /// Get the bytecode for the target, reading it from disk when the target
    /// is a path and treating it as inline hex otherwise.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        let contents = if Path::new(&self.target).is_file() {
            std::fs::read_to_string(&self.target)?
        } else {
            self.target.clone()
        };

        Ok(decode_hex_lossy(contents.trim()))
    }
}

impl DisassemblerArgsBuilder {
    /// Create a new instance of the [`DisassemblerArgsBuilder`]
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            decimal_counter: Some(false),
            name: Some(String::new()),
            output: Some(String::new()),
        }
    }
}

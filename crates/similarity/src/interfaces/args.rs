use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use std::path::Path;

/// Arguments for the comparison subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Score the similarity of two EVM bytecodes",
    override_usage = "hugin compare <TARGET> <CANDIDATE> [OPTIONS]"
)]
pub struct CompareArgs {
    /// The first contract, either a file containing hex bytecode or a raw
    /// hex bytecode string.
    #[clap(required = true)]
    pub target: String,

    /// The second contract, same formats as the target.
    #[clap(required = true)]
    pub candidate: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to, or 'print' to print to
    /// the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl CompareArgs {
    /// Get both bytecode hex strings, reading from disk where the argument
    /// is a path.
    pub fn get_bytecodes(&self) -> Result<(String, String)> {
        Ok((read_target(&self.target)?, read_target(&self.candidate)?))
    }
}

fn read_target(target: &str) -> Result<String> {
    if Path::new(target).is_file() {
        Ok(std::fs::read_to_string(target)?.trim().to_string())
    } else {
        Ok(target.to_string())
    }
}

impl CompareArgsBuilder {
    /// Create a new instance of the [`CompareArgsBuilder`]
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            candidate: Some(String::new()),
            name: Some(String::new()),
            output: Some(String::new()),
        }
    }
}

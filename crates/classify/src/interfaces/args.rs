use clap::Parser;
use derive_builder::Builder;
use eyre::Result;
use hugin_disassemble::{analyze, EvmAnalysis};
use std::path::Path;

/// Arguments for the classification subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Classify the capabilities of an EVM contract",
    override_usage = "hugin classify <TARGET> [OPTIONS]"
)]
pub struct ClassifyArgs {
    /// The target to classify, either a file containing hex bytecode or a
    /// raw hex bytecode string.
    #[clap(required = true)]
    pub target: String,

    /// The contract address to attach to emitted capability rows.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub address: String,

    /// Path to a file containing verified source or decompiled pseudocode
    /// for keyword evidence.
    #[clap(long = "source-text", short = 's', default_value = "", hide_default_value = true)]
    pub source_text: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to, or 'print' to print to
    /// the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl ClassifyArgs {
    /// Get the bytecode hex for the target, reading it from disk when the
    /// target is a path.
    pub fn get_bytecode_hex(&self) -> Result<String> {
        if Path::new(&self.target).is_file() {
            Ok(std::fs::read_to_string(&self.target)?.trim().to_string())
        } else {
            Ok(self.target.clone())
        }
    }

    /// Read the free-text evidence file, if one was given.
    pub fn get_source_text(&self) -> Result<Option<String>> {
        if self.source_text.is_empty() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.source_text)?))
    }

    /// Analyze the target bytecode, or `None` when the target is empty.
    ///
    /// Absent bytecode is modeled as the absence of an analysis, never as
    /// an analysis of zero instructions.
    pub fn get_analysis(&self) -> Result<Option<EvmAnalysis>> {
        let bytecode = self.get_bytecode_hex()?;
        if bytecode.is_empty() || bytecode == "0x" {
            return Ok(None);
        }
        Ok(Some(analyze(&bytecode)))
    }
}

impl ClassifyArgsBuilder {
    /// Create a new instance of the [`ClassifyArgsBuilder`]
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            address: Some(String::new()),
            source_text: Some(String::new()),
            name: Some(String::new()),
            output: Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_analysis_absent_bytecode_is_none() {
        let args =
            ClassifyArgsBuilder::new().target(String::new()).build().expect("build failed");
        assert!(args.get_analysis().expect("analysis failed").is_none());

        let args =
            ClassifyArgsBuilder::new().target("0x".to_string()).build().expect("build failed");
        assert!(args.get_analysis().expect("analysis failed").is_none());
    }

    #[test]
    fn test_get_analysis_present_bytecode() {
        let args =
            ClassifyArgsBuilder::new().target("0x6001".to_string()).build().expect("build failed");
        let analysis = args.get_analysis().expect("analysis failed").expect("expected analysis");
        assert_eq!(analysis.instructions.len(), 1);
    }
}

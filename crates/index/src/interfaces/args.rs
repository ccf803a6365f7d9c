use clap::Parser;
use derive_builder::Builder;
use eyre::{eyre, Result};
use std::path::Path;

use crate::core::{ContractRecord, IndexConfig};

/// Arguments for the index subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Build an approximate similarity index over a contract population",
    override_usage = "hugin index <INPUT> [OPTIONS]"
)]
pub struct IndexArgs {
    /// Path to a JSON file containing the contract population, an array of
    /// objects with `address` and `runtime_bytecode` fields.
    #[clap(required = true)]
    pub input: String,

    /// Optional path to a JSON file of reference contracts. When given, the
    /// population is compared against the references instead of itself.
    #[clap(long = "reference-file", short = 'r', default_value = "", hide_default_value = true)]
    pub reference_file: String,

    /// Minimum combined score for a row to be emitted.
    #[clap(long, short, default_value = "0.35", hide_default_value = true)]
    pub threshold: f64,

    /// Maximum emitted rows per contract, 0 for unlimited.
    #[clap(long = "max-matches", short = 'm', default_value = "10", hide_default_value = true)]
    pub max_matches: usize,

    /// Seed for the random comparison sampler.
    #[clap(long, short, default_value = "0", hide_default_value = true)]
    pub seed: u64,

    /// Locality window: how many neighbors on each side of a contract are
    /// always compared.
    #[clap(long, short = 'w', default_value = "50", hide_default_value = true)]
    pub window: usize,

    /// Maximum candidate comparisons per contract.
    #[clap(long, short = 'c', default_value = "200", hide_default_value = true)]
    pub cap: usize,

    /// The output directory to write the output to, or 'print' to print to
    /// the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,
}

impl IndexArgs {
    /// Load the contract population from the input file.
    pub fn get_records(&self) -> Result<Vec<ContractRecord>> {
        read_records(&self.input)
    }

    /// Load the reference contracts, if a reference file was given.
    pub fn get_references(&self) -> Result<Option<Vec<ContractRecord>>> {
        if self.reference_file.is_empty() {
            return Ok(None);
        }
        Ok(Some(read_records(&self.reference_file)?))
    }

    /// Build the index configuration from the arguments, leaving the
    /// remaining tunables at their defaults.
    pub fn to_config(&self) -> IndexConfig {
        IndexConfig {
            min_score: self.threshold,
            max_matches: self.max_matches,
            seed: self.seed,
            locality_window: self.window,
            comparison_cap: self.cap,
            ..Default::default()
        }
    }
}

fn read_records(path: &str) -> Result<Vec<ContractRecord>> {
    if !Path::new(path).is_file() {
        return Err(eyre!("contracts file not found: {}", path));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

impl IndexArgsBuilder {
    /// Create a new instance of the [`IndexArgsBuilder`]
    pub fn new() -> Self {
        Self {
            input: Some(String::new()),
            reference_file: Some(String::new()),
            threshold: Some(0.35),
            max_matches: Some(10),
            seed: Some(0),
            window: Some(50),
            cap: Some(200),
            output: Some(String::new()),
            name: Some(String::new()),
        }
    }
}
